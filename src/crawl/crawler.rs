//! The crawl orchestrator: a sequential BFS loop over people, bounded
//! by depth and visited-node count.
//!
//! One frontier entry is fully processed (retrieval, extraction, edge
//! admission) before the next is dequeued, so the graph, frontier and
//! visited set have exactly one writer and need no locking. A shared
//! stop flag, flipped by the Ctrl-C handler in the binary, is the only
//! cross-task state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::CrawlConfig;
use crate::crawl::{is_valid_candidate, Frontier, RelationExtractor, TextSource};
use crate::error::ScigraphError;
use crate::graph::{InfluenceGraph, Relation};

/// Terminal state of a crawl run. Whatever the outcome, the caller is
/// expected to persist the accumulated graph before reporting.
#[derive(Debug)]
pub enum CrawlOutcome {
    /// Frontier exhausted or visited cap reached.
    Done,
    /// Stop flag raised (user interruption); partial graph preserved.
    Interrupted,
    /// Unexpected failure outside the extraction cascade (retrieval
    /// transport error, etc.); partial graph preserved.
    Failed(ScigraphError),
}

pub struct Crawler<S, E> {
    source: S,
    extractor: E,
    config: CrawlConfig,
    frontier: Frontier,
    graph: InfluenceGraph,
    stop: Arc<AtomicBool>,
}

impl<S: TextSource, E: RelationExtractor> Crawler<S, E> {
    pub fn new(source: S, extractor: E, config: CrawlConfig) -> Self {
        Self {
            source,
            extractor,
            config,
            frontier: Frontier::new(),
            graph: InfluenceGraph::new(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag that aborts the run at the next loop iteration when
    /// set. Hand a clone to a signal handler.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// The graph accumulated so far. Valid (and worth saving) in every
    /// terminal state.
    pub fn graph(&self) -> &InfluenceGraph {
        &self.graph
    }

    pub fn visited_count(&self) -> usize {
        self.frontier.visited_count()
    }

    /// Run the BFS to a terminal state. Never panics out of the loop;
    /// unexpected errors are returned inside [`CrawlOutcome::Failed`].
    pub async fn run(&mut self) -> CrawlOutcome {
        let max = self.config.max_scientists;
        self.frontier.enqueue(&self.config.seed, 0);

        log::info!(
            "Starting influence crawl from {:?} (max depth {}, max scientists {})",
            self.config.seed,
            self.config.max_depth,
            max
        );

        loop {
            if self.stop.load(Ordering::Relaxed) {
                log::warn!("Interrupted; stopping with partial graph");
                return CrawlOutcome::Interrupted;
            }

            if self.frontier.visited_count() >= max {
                log::info!("Visited cap reached ({} names)", max);
                break;
            }

            let Some((name, depth)) = self.frontier.dequeue() else {
                log::info!("Frontier exhausted");
                break;
            };

            // Duplicate suppression happens here, before any external
            // call or graph mutation; the same name may sit in the
            // queue several times.
            if self.frontier.is_visited(&name) {
                continue;
            }

            log::info!(
                "[{}/{}] Visiting {} (depth {})",
                self.frontier.visited_count() + 1,
                max,
                name,
                depth
            );

            let page = match self.source.fetch(&name).await {
                Ok(page) => page,
                Err(e) => {
                    log::error!("Text retrieval failed for {:?}: {}", name, e);
                    return CrawlOutcome::Failed(e);
                }
            };

            let Some(page) = page else {
                // Not found upstream: remember the name so it is never
                // re-queued, but keep it out of the graph.
                log::warn!("No page found for {:?}; skipping", name);
                self.frontier.mark_visited(&name);
                continue;
            };

            self.frontier.mark_visited(&name);
            self.graph.add_node(&name, depth);

            if depth >= self.config.max_depth {
                log::debug!("{:?} is at max depth; added as leaf", name);
                continue;
            }

            let relations = self
                .extractor
                .extract(&page.content, &name, &page.links)
                .await;

            // A influenced `name`: edge A -> name
            for person in &relations.inspirations {
                self.admit(person, &name, person, depth);
            }
            // `name` influenced B: edge name -> B
            for person in &relations.inspired {
                self.admit(&name, person, person, depth);
            }

            log::info!(
                "  {} inspirations, {} inspired",
                relations.inspirations.len(),
                relations.inspired.len()
            );

            // Politeness toward the upstream APIs
            tokio::time::sleep(self.config.politeness_delay()).await;
        }

        log::info!(
            "Crawl complete: {} nodes, {} edges, {} names visited",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.frontier.visited_count()
        );
        CrawlOutcome::Done
    }

    /// Admit one extracted relation: filter the candidate, insert the
    /// edge, and enqueue the candidate for later expansion. `candidate`
    /// is whichever endpoint came from the extractor; the subject being
    /// processed is the other one.
    fn admit(&mut self, source: &str, target: &str, candidate: &str, subject_depth: u32) {
        // Self-loop guard: the subject is one endpoint, so equal
        // endpoints mean the extractor cited the subject itself.
        if source == target {
            return;
        }
        if !is_valid_candidate(candidate) {
            log::debug!("Rejected candidate name {:?}", candidate);
            return;
        }
        self.graph.add_edge(source, target, Relation::Inspired);
        if !self.frontier.is_visited(candidate) {
            self.frontier.enqueue(candidate, subject_depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::PageText;
    use crate::error::Result;
    use crate::llm::RelationLists;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory text source keyed by name; records fetch calls.
    #[derive(Default)]
    struct MapSource {
        pages: HashMap<String, Vec<String>>,
        fail_on: Option<String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MapSource {
        fn with_pages(names: &[&str]) -> Self {
            let mut pages = HashMap::new();
            for name in names {
                pages.insert(name.to_string(), Vec::new());
            }
            Self {
                pages,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl TextSource for MapSource {
        async fn fetch(&self, name: &str) -> Result<Option<PageText>> {
            self.calls.lock().unwrap().push(name.to_string());
            if self.fail_on.as_deref() == Some(name) {
                return Err(ScigraphError::Fetch("boom".to_string()));
            }
            Ok(self.pages.get(name).map(|links| PageText {
                content: format!("Biography of {}", name),
                links: links.clone(),
            }))
        }
    }

    /// In-memory extractor keyed by subject; records extract calls.
    #[derive(Default)]
    struct MapExtractor {
        relations: HashMap<String, RelationLists>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl RelationExtractor for MapExtractor {
        async fn extract(&self, _content: &str, subject: &str, _hints: &[String]) -> RelationLists {
            self.calls.lock().unwrap().push(subject.to_string());
            self.relations.get(subject).cloned().unwrap_or_default()
        }
    }

    fn test_config(max_depth: u32, max_scientists: usize) -> CrawlConfig {
        CrawlConfig {
            seed: "A A".to_string(),
            max_depth,
            max_scientists,
            politeness_delay_ms: 0,
            output_path: "out.json".into(),
        }
    }

    fn lists(inspirations: &[&str], inspired: &[&str]) -> RelationLists {
        RelationLists {
            inspirations: inspirations.iter().map(|s| s.to_string()).collect(),
            inspired: inspired.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_scenario_depth_one_leaves() {
        // Seed yields one inspiration and one inspired; max_depth=1 so
        // both become leaves with no extraction of their own.
        let mut source = MapSource::with_pages(&["A A", "B C", "D E"]);
        source.pages.insert("B C".into(), vec![]);
        let mut extractor = MapExtractor::default();
        extractor
            .relations
            .insert("A A".into(), lists(&["B C"], &["D E"]));
        let extract_calls = Arc::clone(&extractor.calls);

        let mut crawler = Crawler::new(source, extractor, test_config(1, 10));
        let outcome = crawler.run().await;
        assert!(matches!(outcome, CrawlOutcome::Done));

        let g = crawler.graph();
        assert_eq!(g.depth_of("A A"), Some(0));
        assert_eq!(g.depth_of("B C"), Some(1));
        assert_eq!(g.depth_of("D E"), Some(1));
        assert!(g.has_edge("B C", "A A", Relation::Inspired));
        assert!(g.has_edge("A A", "D E", Relation::Inspired));
        assert_eq!(g.edge_count(), 2);
        // Only the seed was expanded
        assert_eq!(*extract_calls.lock().unwrap(), vec!["A A".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_names_rejected() {
        // "Xy" too short, "NoSpace" has no whitespace: no edge, no enqueue.
        let source = MapSource::with_pages(&["A A"]);
        let fetch_calls = Arc::clone(&source.calls);
        let mut extractor = MapExtractor::default();
        extractor
            .relations
            .insert("A A".into(), lists(&["Xy"], &["NoSpace"]));

        let mut crawler = Crawler::new(source, extractor, test_config(3, 10));
        let outcome = crawler.run().await;
        assert!(matches!(outcome, CrawlOutcome::Done));
        assert_eq!(crawler.graph().node_count(), 1);
        assert_eq!(crawler.graph().edge_count(), 0);
        assert_eq!(fetch_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_self_loop_rejected() {
        let source = MapSource::with_pages(&["A A"]);
        let mut extractor = MapExtractor::default();
        extractor
            .relations
            .insert("A A".into(), lists(&["A A"], &["A A"]));

        let mut crawler = Crawler::new(source, extractor, test_config(3, 10));
        crawler.run().await;
        assert_eq!(crawler.graph().edge_count(), 0);
        assert!(!crawler.graph().has_edge("A A", "A A", Relation::Inspired));
    }

    #[tokio::test]
    async fn test_visited_cap_terminates() {
        // max_scientists = 1: only the seed is processed; discoveries
        // stay queued forever.
        let source = MapSource::with_pages(&["A A", "B C"]);
        let fetch_calls = Arc::clone(&source.calls);
        let mut extractor = MapExtractor::default();
        extractor
            .relations
            .insert("A A".into(), lists(&["B C"], &[]));

        let mut crawler = Crawler::new(source, extractor, test_config(3, 1));
        let outcome = crawler.run().await;
        assert!(matches!(outcome, CrawlOutcome::Done));
        assert_eq!(crawler.visited_count(), 1);
        assert_eq!(*fetch_calls.lock().unwrap(), vec!["A A".to_string()]);
        // Seed node plus the placeholder created by edge insertion
        assert_eq!(crawler.graph().depth_of("A A"), Some(0));
        assert_eq!(crawler.graph().depth_of("B C"), None);
        assert!(crawler.graph().has_edge("B C", "A A", Relation::Inspired));
    }

    #[tokio::test]
    async fn test_not_found_marks_visited_and_skips() {
        // "B C" has no page: marked visited, absent from the graph as a
        // visited node (it stays a placeholder from the edge), and the
        // crawl carries on to "D E".
        let source = MapSource::with_pages(&["A A", "D E"]);
        let mut extractor = MapExtractor::default();
        extractor
            .relations
            .insert("A A".into(), lists(&["B C"], &["D E"]));

        let mut crawler = Crawler::new(source, extractor, test_config(3, 10));
        let outcome = crawler.run().await;
        assert!(matches!(outcome, CrawlOutcome::Done));
        assert_eq!(crawler.graph().depth_of("B C"), None);
        assert_eq!(crawler.graph().depth_of("D E"), Some(1));
        assert_eq!(crawler.visited_count(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_dequeue_no_external_calls() {
        // "B C" is discovered by both branches of the seed's relations,
        // so it is enqueued twice but fetched once.
        let source = MapSource::with_pages(&["A A", "B C"]);
        let fetch_calls = Arc::clone(&source.calls);
        let mut extractor = MapExtractor::default();
        extractor
            .relations
            .insert("A A".into(), lists(&["B C"], &["B C"]));

        let mut crawler = Crawler::new(source, extractor, test_config(3, 10));
        crawler.run().await;
        let fetches: Vec<_> = fetch_calls.lock().unwrap().clone();
        assert_eq!(
            fetches.iter().filter(|n| n.as_str() == "B C").count(),
            1
        );
        // Both edges exist: B C -> A A and A A -> B C
        assert!(crawler.graph().has_edge("B C", "A A", Relation::Inspired));
        assert!(crawler.graph().has_edge("A A", "B C", Relation::Inspired));
    }

    #[tokio::test]
    async fn test_extraction_failure_degrades_gracefully() {
        // Extractor knows nothing (cascade exhausted -> empty lists):
        // node is still visited and kept with its depth.
        let source = MapSource::with_pages(&["A A"]);
        let extractor = MapExtractor::default();

        let mut crawler = Crawler::new(source, extractor, test_config(3, 10));
        let outcome = crawler.run().await;
        assert!(matches!(outcome, CrawlOutcome::Done));
        assert_eq!(crawler.graph().depth_of("A A"), Some(0));
        assert_eq!(crawler.graph().edge_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_error_fails_run_preserving_graph() {
        let mut source = MapSource::with_pages(&["A A", "B C"]);
        source.fail_on = Some("B C".to_string());
        let mut extractor = MapExtractor::default();
        extractor
            .relations
            .insert("A A".into(), lists(&[], &["B C"]));

        let mut crawler = Crawler::new(source, extractor, test_config(3, 10));
        let outcome = crawler.run().await;
        assert!(matches!(outcome, CrawlOutcome::Failed(_)));
        // Progress up to the failure is preserved
        assert_eq!(crawler.graph().depth_of("A A"), Some(0));
        assert!(crawler.graph().has_edge("A A", "B C", Relation::Inspired));
    }

    #[tokio::test]
    async fn test_stop_flag_interrupts() {
        let source = MapSource::with_pages(&["A A"]);
        let extractor = MapExtractor::default();
        let mut crawler = Crawler::new(source, extractor, test_config(3, 10));
        crawler.stop_flag().store(true, Ordering::Relaxed);
        let outcome = crawler.run().await;
        assert!(matches!(outcome, CrawlOutcome::Interrupted));
        assert!(crawler.graph().is_empty());
    }

    #[tokio::test]
    async fn test_depth_bound_property() {
        // Chain A A -> B C -> D E -> F G with max_depth 2: F G is
        // discovered at depth 3 but, enqueued only from a depth-2 node,
        // never enqueued at all (depth-2 nodes are leaves).
        let source = MapSource::with_pages(&["A A", "B C", "D E", "F G"]);
        let mut extractor = MapExtractor::default();
        extractor
            .relations
            .insert("A A".into(), lists(&[], &["B C"]));
        extractor
            .relations
            .insert("B C".into(), lists(&[], &["D E"]));
        extractor
            .relations
            .insert("D E".into(), lists(&[], &["F G"]));

        let mut crawler = Crawler::new(source, extractor, test_config(2, 10));
        crawler.run().await;
        let g = crawler.graph();
        assert_eq!(g.depth_of("A A"), Some(0));
        assert_eq!(g.depth_of("B C"), Some(1));
        assert_eq!(g.depth_of("D E"), Some(2));
        // D E hit the depth limit, so F G was never discovered
        assert!(!g.contains_node("F G"));
        for (name, attrs) in g.nodes() {
            if let Some(d) = attrs.depth {
                assert!(d <= 2, "node {} has depth {} > max", name, d);
            }
        }
    }

    #[tokio::test]
    async fn test_seed_not_found_yields_empty_graph() {
        let source = MapSource::with_pages(&[]);
        let extractor = MapExtractor::default();
        let mut crawler = Crawler::new(source, extractor, test_config(3, 10));
        let outcome = crawler.run().await;
        assert!(matches!(outcome, CrawlOutcome::Done));
        assert!(crawler.graph().is_empty());
        assert_eq!(crawler.visited_count(), 1);
    }
}
