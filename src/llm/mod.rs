//! LLM extraction client: a cascade of chat providers asked to pull
//! influence relations out of biographical text.
//!
//! Each provider gets exactly one attempt per call, in a fixed order;
//! the first parseable response wins. When the whole cascade fails the
//! client degrades to empty lists instead of erroring, so a flaky
//! upstream never aborts a crawl.

mod chat;
mod extractor;
mod groq;
mod mistral;
mod ollama;
mod openai;

pub use extractor::LlmExtractor;
pub(crate) use extractor::truncate_chars;
pub use groq::GroqProvider;
pub use mistral::MistralProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The two-list record every extraction call resolves to. Fields
/// default to empty so a response missing a key still parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationLists {
    /// People who influenced the subject.
    #[serde(default)]
    pub inspirations: Vec<String>,
    /// People the subject influenced.
    #[serde(default)]
    pub inspired: Vec<String>,
}

/// One LLM backend in the cascade. A single attempt per call; no
/// internal retries - any failure falls through to the next provider.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send the prompt and return the raw completion text.
    async fn attempt(&self, prompt: &str) -> Result<String>;

    /// Light reachability probe run once before a crawl starts.
    async fn healthcheck(&self) -> Result<()>;
}

/// Sampling temperature for all providers: low, to bias extraction
/// toward repeatable output.
pub(crate) const TEMPERATURE: f32 = 0.1;

pub(crate) const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that outputs only valid JSON.";
