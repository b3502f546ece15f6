//! Bounded BFS crawl: frontier management, candidate filtering, and the
//! orchestrator state machine.
//!
//! The orchestrator talks to its collaborators through the [`TextSource`]
//! and [`RelationExtractor`] seams so tests can substitute in-memory
//! fixtures for Wikipedia and the LLM cascade.

mod crawler;
mod frontier;
mod validate;

pub use crawler::{CrawlOutcome, Crawler};
pub use frontier::Frontier;
pub use validate::is_valid_candidate;

use crate::error::Result;
use crate::llm::RelationLists;
use async_trait::async_trait;

/// Retrieved biographical text for one person.
#[derive(Debug, Clone)]
pub struct PageText {
    /// Bounded summary-plus-body text for LLM consumption.
    pub content: String,
    /// Co-referenced names, order-preserving, used as extraction hints.
    pub links: Vec<String>,
}

/// Biographical text retrieval. `Ok(None)` means no matching entry
/// exists upstream; `Err` is reserved for unexpected transport or
/// protocol failures and aborts the run.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Option<PageText>>;
}

/// Influence-relation extraction. Infallible by contract: upstream
/// failures degrade to empty lists inside the implementation.
#[async_trait]
pub trait RelationExtractor: Send + Sync {
    async fn extract(&self, content: &str, subject: &str, hints: &[String]) -> RelationLists;
}
