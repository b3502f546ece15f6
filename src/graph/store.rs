//! Graph persistence: JSON node-link files.
//!
//! The saved file is the sole handoff artifact to downstream analytics
//! and visualization tooling, so the format is plain node-link JSON:
//! a sorted node list with optional depths and a sorted edge list with
//! relation tags. Save then load reconstructs an identical graph.

use crate::error::Result;
use crate::graph::{InfluenceGraph, Relation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct GraphFile {
    directed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<DateTime<Utc>>,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeRecord {
    source: String,
    target: String,
    relation: Relation,
}

/// Write the graph to `path` as pretty-printed JSON, creating parent
/// directories as needed. Node and edge order is sorted, so output for
/// the same graph is byte-stable apart from the timestamp.
pub fn save_graph(graph: &InfluenceGraph, path: &Path) -> Result<()> {
    let file = GraphFile {
        directed: true,
        generated_at: Some(Utc::now()),
        nodes: graph
            .nodes()
            .map(|(name, attrs)| NodeRecord {
                name: name.to_string(),
                depth: attrs.depth,
            })
            .collect(),
        edges: graph
            .edges()
            .map(|(source, target, relation)| EdgeRecord {
                source: source.to_string(),
                target: target.to_string(),
                relation,
            })
            .collect(),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(&file)?;
    fs::write(path, json)?;
    log::info!(
        "Graph saved to {} ({} nodes, {} edges)",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(())
}

/// Load a graph previously written by [`save_graph`].
pub fn load_graph(path: &Path) -> Result<InfluenceGraph> {
    let json = fs::read_to_string(path)?;
    let file: GraphFile = serde_json::from_str(&json)?;

    let mut graph = InfluenceGraph::new();
    for edge in &file.edges {
        graph.add_edge(&edge.source, &edge.target, edge.relation);
    }
    // Nodes after edges so isolated nodes and depths are both restored
    for node in &file.nodes {
        if let Some(depth) = node.depth {
            graph.add_node(&node.name, depth);
        } else {
            graph.ensure_node(&node.name);
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_graph() -> InfluenceGraph {
        let mut g = InfluenceGraph::new();
        g.add_node("Albert Einstein", 0);
        g.add_node("Isaac Newton", 1);
        g.add_edge("Isaac Newton", "Albert Einstein", Relation::Inspired);
        g.add_edge("Albert Einstein", "Nathan Rosen", Relation::Inspired);
        g
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graph.json");
        let g = sample_graph();
        save_graph(&g, &path).unwrap();

        let loaded = load_graph(&path).unwrap();
        assert_eq!(loaded.node_count(), g.node_count());
        assert_eq!(loaded.edge_count(), g.edge_count());
        assert_eq!(loaded.depth_of("Albert Einstein"), Some(0));
        assert_eq!(loaded.depth_of("Isaac Newton"), Some(1));
        // Placeholder stays a placeholder
        assert_eq!(loaded.depth_of("Nathan Rosen"), None);
        assert!(loaded.has_edge("Isaac Newton", "Albert Einstein", Relation::Inspired));
        assert!(loaded.has_edge("Albert Einstein", "Nathan Rosen", Relation::Inspired));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/graph.json");
        save_graph(&sample_graph(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_relation_tag_serialized_as_inspired() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graph.json");
        save_graph(&sample_graph(), &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"relation\": \"inspired\""));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        assert!(load_graph(&temp.path().join("absent.json")).is_err());
    }
}
