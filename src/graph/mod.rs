//! Influence graph accumulator: directed graph over scientist names.
//!
//! Nodes carry a BFS `depth` assigned once at first visit; edges carry a
//! relation tag. Edge insertion creates missing endpoints as placeholder
//! nodes (no depth yet), so extraction results can reference people the
//! crawl has not visited.

mod store;

pub use store::{load_graph, save_graph};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Semantic tag on an edge. Only one relation kind is produced today;
/// a typed enum keeps the serialized tag fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// `source` influenced `target`.
    Inspired,
}

/// Attributes attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttrs {
    /// BFS distance from the seed, set exactly once when the node is
    /// visited. `None` for placeholder nodes only referenced by edges.
    pub depth: Option<u32>,
}

#[derive(Debug, Default, Clone)]
struct NodeEntry {
    attrs: NodeAttrs,
    /// (target, relation) pairs, deduplicated.
    outgoing: BTreeSet<(String, Relation)>,
    /// (source, relation) pairs, deduplicated.
    incoming: BTreeSet<(String, Relation)>,
}

/// Directed graph of influence relations, keyed by canonical display
/// name (case- and accent-sensitive, no normalization).
#[derive(Debug, Default, Clone)]
pub struct InfluenceGraph {
    nodes: BTreeMap<String, NodeEntry>,
    edge_count: usize,
}

impl InfluenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with its visit depth. Idempotent: an existing depth is
    /// never overwritten, so a placeholder created by `add_edge` gets its
    /// depth filled in on first visit and keeps it afterwards.
    pub fn add_node(&mut self, name: &str, depth: u32) {
        let entry = self.nodes.entry(name.to_string()).or_default();
        if entry.attrs.depth.is_none() {
            entry.attrs.depth = Some(depth);
        }
    }

    /// Ensure a node exists without assigning a depth. Used when
    /// restoring placeholder nodes from a saved file.
    pub fn ensure_node(&mut self, name: &str) {
        self.nodes.entry(name.to_string()).or_default();
    }

    /// Add a directed edge. Missing endpoints are created as placeholder
    /// nodes without a depth. Returns true if the edge was new; a
    /// duplicate (source, target, relation) triple is a no-op.
    pub fn add_edge(&mut self, source: &str, target: &str, relation: Relation) -> bool {
        self.nodes.entry(source.to_string()).or_default();
        self.nodes.entry(target.to_string()).or_default();

        let inserted = self
            .nodes
            .get_mut(source)
            .map(|e| e.outgoing.insert((target.to_string(), relation)))
            .unwrap_or(false);
        if inserted {
            if let Some(e) = self.nodes.get_mut(target) {
                e.incoming.insert((source.to_string(), relation));
            }
            self.edge_count += 1;
        }
        inserted
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Depth of a node, if it has been visited. `None` both for unknown
    /// names and for placeholder nodes.
    pub fn depth_of(&self, name: &str) -> Option<u32> {
        self.nodes.get(name).and_then(|e| e.attrs.depth)
    }

    pub fn has_edge(&self, source: &str, target: &str, relation: Relation) -> bool {
        self.nodes
            .get(source)
            .map(|e| e.outgoing.contains(&(target.to_string(), relation)))
            .unwrap_or(false)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in sorted name order with their attributes.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeAttrs)> {
        self.nodes.iter().map(|(name, e)| (name.as_str(), &e.attrs))
    }

    /// All edges as (source, target, relation), sorted by source then target.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, Relation)> {
        self.nodes.iter().flat_map(|(source, e)| {
            e.outgoing
                .iter()
                .map(move |(target, rel)| (source.as_str(), target.as_str(), *rel))
        })
    }

    /// Number of edges arriving at a node.
    pub fn in_degree(&self, name: &str) -> usize {
        self.nodes.get(name).map(|e| e.incoming.len()).unwrap_or(0)
    }

    /// Number of edges leaving a node.
    pub fn out_degree(&self, name: &str) -> usize {
        self.nodes.get(name).map(|e| e.outgoing.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_sets_depth_once() {
        let mut g = InfluenceGraph::new();
        g.add_node("Albert Einstein", 0);
        g.add_node("Albert Einstein", 5);
        assert_eq!(g.depth_of("Albert Einstein"), Some(0));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_add_edge_creates_placeholder_endpoints() {
        let mut g = InfluenceGraph::new();
        assert!(g.add_edge("Isaac Newton", "Albert Einstein", Relation::Inspired));
        assert!(g.contains_node("Isaac Newton"));
        assert!(g.contains_node("Albert Einstein"));
        // Placeholders have no depth until visited
        assert_eq!(g.depth_of("Isaac Newton"), None);
        assert_eq!(g.depth_of("Albert Einstein"), None);
    }

    #[test]
    fn test_placeholder_depth_filled_in_on_visit() {
        let mut g = InfluenceGraph::new();
        g.add_edge("Isaac Newton", "Albert Einstein", Relation::Inspired);
        g.add_node("Isaac Newton", 1);
        assert_eq!(g.depth_of("Isaac Newton"), Some(1));
    }

    #[test]
    fn test_add_edge_idempotent() {
        let mut g = InfluenceGraph::new();
        assert!(g.add_edge("A B", "C D", Relation::Inspired));
        assert!(!g.add_edge("A B", "C D", Relation::Inspired));
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge("A B", "C D", Relation::Inspired));
    }

    #[test]
    fn test_edges_directed() {
        let mut g = InfluenceGraph::new();
        g.add_edge("A B", "C D", Relation::Inspired);
        assert!(g.has_edge("A B", "C D", Relation::Inspired));
        assert!(!g.has_edge("C D", "A B", Relation::Inspired));
        // Reverse direction is a distinct edge
        assert!(g.add_edge("C D", "A B", Relation::Inspired));
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_degrees() {
        let mut g = InfluenceGraph::new();
        g.add_edge("A B", "C D", Relation::Inspired);
        g.add_edge("E F", "C D", Relation::Inspired);
        g.add_edge("C D", "G H", Relation::Inspired);
        assert_eq!(g.in_degree("C D"), 2);
        assert_eq!(g.out_degree("C D"), 1);
        assert_eq!(g.in_degree("A B"), 0);
        assert_eq!(g.out_degree("unknown"), 0);
    }

    #[test]
    fn test_iterators_sorted() {
        let mut g = InfluenceGraph::new();
        g.add_node("Zed Zee", 1);
        g.add_node("Ada Lovelace", 0);
        let names: Vec<_> = g.nodes().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Ada Lovelace", "Zed Zee"]);
    }
}
