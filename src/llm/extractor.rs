//! The extraction client: prompt construction, provider cascade, and
//! tolerant JSON parsing.

use crate::config::LlmConfig;
use crate::crawl::RelationExtractor;
use crate::error::{Result, ScigraphError};
use crate::llm::{
    GroqProvider, MistralProvider, OllamaProvider, OpenAiProvider, Provider, RelationLists,
};
use async_trait::async_trait;

/// Article text is truncated past this many characters to stay inside
/// provider context limits.
const MAX_TEXT_CHARS: usize = 25_000;

/// At most this many link hints are embedded in the prompt.
const MAX_HINTS: usize = 200;

/// Cascading extraction client. Holds an ordered list of providers and
/// tries each once per call, short-circuiting on the first response
/// that parses into [`RelationLists`].
pub struct LlmExtractor {
    providers: Vec<Box<dyn Provider>>,
}

impl LlmExtractor {
    /// Build the cascade from configuration. Order is fixed: Groq if
    /// enabled, then Mistral if enabled, then Ollama unconditionally
    /// (local last resort), then OpenAI only when no other provider is
    /// enabled at all.
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut providers: Vec<Box<dyn Provider>> = Vec::new();
        if config.groq.enabled {
            providers.push(Box::new(GroqProvider::new(&config.groq)));
        }
        if config.mistral.enabled {
            providers.push(Box::new(MistralProvider::new(&config.mistral)));
        }
        providers.push(Box::new(OllamaProvider::new(&config.ollama)));
        if !config.groq.enabled && !config.mistral.enabled && !config.ollama.enabled {
            providers.push(Box::new(OpenAiProvider::new(&config.openai)));
        }
        Self { providers }
    }

    /// Build from an explicit provider list (tests).
    pub fn with_providers(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Probe the active (first-in-cascade) provider. Returns false with
    /// logged guidance when it is unreachable; the crawl binary refuses
    /// to start in that case.
    pub async fn check_connection(&self) -> bool {
        let Some(active) = self.providers.first() else {
            log::error!("No LLM providers configured");
            return false;
        };
        log::info!("Checking LLM service ({})...", active.name());
        match active.healthcheck().await {
            Ok(()) => {
                log::info!("LLM provider {} is reachable", active.name());
                true
            }
            Err(e) => {
                log::error!("LLM provider {} check failed: {}", active.name(), e);
                false
            }
        }
    }
}

#[async_trait]
impl RelationExtractor for LlmExtractor {
    async fn extract(&self, content: &str, subject: &str, hints: &[String]) -> RelationLists {
        let prompt = build_prompt(content, subject, hints);
        log::debug!("Querying LLM cascade for {:?}", subject);

        for provider in &self.providers {
            match provider.attempt(&prompt).await {
                Ok(raw) => match parse_relations(&raw) {
                    Ok(lists) => {
                        log::debug!("{} answered for {:?}", provider.name(), subject);
                        return lists;
                    }
                    Err(e) => {
                        log::warn!("{} response unusable: {}; falling through", provider.name(), e);
                    }
                },
                Err(e) => {
                    log::warn!("{} failed: {}; falling through", provider.name(), e);
                }
            }
        }

        log::warn!(
            "All LLM providers failed for {:?}; continuing with empty relation lists",
            subject
        );
        RelationLists::default()
    }
}

/// History-of-science analyst prompt. Hints bias the model toward
/// correctly spelled names that actually occur in the article.
pub fn build_prompt(content: &str, subject: &str, hints: &[String]) -> String {
    let hint_list = hints
        .iter()
        .take(MAX_HINTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an expert analyst in the history of science.
Analyze the text below regarding "{subject}" to ALGORITHMICALLY extract their influence network.

Task:
1. "inspirations": Who influenced {subject}? (Mentors, predecessors, cited idols)
2. "inspired": Who did {subject} influence? (Famous students, successors, admirers cited)

CRITICAL Constraints:
- Respond ONLY with valid JSON.
- DO NOT cite "{subject}" themselves.
- If the text mentions no one, return empty lists.
- **HINT**: The following entities are explicitly linked in the text. Prefer using names from this list if relevant (helps with spelling):
  [{hint_list}]
- Exact expected format:
{{
  "inspirations": ["Name1", "Name2"],
  "inspired": ["Name3", "Name4"]
}}

Text to analyze:
{text}"#,
        subject = subject,
        hint_list = hint_list,
        text = truncate_chars(content, MAX_TEXT_CHARS),
    )
}

/// Parse a completion into [`RelationLists`], tolerating conversational
/// wrapper text and markdown fences: the substring between the first
/// opening brace and the last closing brace is what gets parsed.
pub fn parse_relations(response: &str) -> Result<RelationLists> {
    let start = response
        .find('{')
        .ok_or_else(|| ScigraphError::Extraction("no JSON object in response".to_string()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| ScigraphError::Extraction("no JSON object in response".to_string()))?;
    if end < start {
        return Err(ScigraphError::Extraction(
            "no JSON object in response".to_string(),
        ));
    }
    let json = &response[start..=end];
    serde_json::from_str(json)
        .map_err(|e| ScigraphError::Extraction(format!("JSON decode failed: {}", e)))
}

/// Truncate at a character (not byte) boundary.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
