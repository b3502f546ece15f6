pub mod config;
pub mod crawl;
pub mod error;
pub mod graph;
pub mod llm;
pub mod wiki;

pub use config::Config;
pub use crawl::{CrawlOutcome, Crawler};
pub use error::{Result, ScigraphError};
pub use graph::{load_graph, save_graph, InfluenceGraph, Relation};
pub use llm::{LlmExtractor, RelationLists};
pub use wiki::WikipediaClient;
