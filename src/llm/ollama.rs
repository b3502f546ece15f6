//! Ollama provider: self-hosted last resort. Always in the cascade,
//! whether or not it is the active configured backend, because a local
//! attempt costs nothing compared to giving up.

use crate::config::OllamaConfig;
use crate::error::{Result, ScigraphError};
use crate::llm::{Provider, TEMPERATURE};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

pub struct OllamaProvider {
    client: Client,
    url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &OllamaConfig) -> Self {
        // Generous timeout: local models are slow
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn attempt(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ScigraphError::Extraction(format!(
                    "ollama unreachable at {} ({}); is `ollama serve` running?",
                    self.url, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScigraphError::Extraction(format!(
                "ollama API error {}",
                status
            )));
        }

        let result: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ScigraphError::Extraction(format!("ollama malformed response: {}", e)))?;
        Ok(result.response)
    }

    async fn healthcheck(&self) -> Result<()> {
        // Short probe timeout; the server answers /api/tags instantly
        let response = self
            .client
            .get(format!("{}/api/tags", self.url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .map_err(|e| {
                ScigraphError::Extraction(format!("cannot reach ollama at {}: {}", self.url, e))
            })?;

        if !response.status().is_success() {
            return Err(ScigraphError::Extraction(format!(
                "ollama responded with status {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| ScigraphError::Extraction(format!("ollama malformed tag list: {}", e)))?;
        let model_found = tags.models.iter().any(|m| m.name.contains(&self.model));
        if !model_found {
            // Ollama can pull on demand, so this is a warning, not a failure
            log::warn!(
                "Model {:?} not in ollama tag list; run `ollama pull {}` if generation fails",
                self.model,
                self.model
            );
        }
        Ok(())
    }
}
