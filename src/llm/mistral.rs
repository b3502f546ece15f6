//! Mistral chat provider: secondary fallback after Groq.

use crate::config::MistralConfig;
use crate::error::{Result, ScigraphError};
use crate::llm::chat::{messages_for, post_chat, ChatRequest};
use crate::llm::{Provider, TEMPERATURE};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct MistralProvider {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl MistralProvider {
    pub fn new(config: &MistralConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: std::env::var(&config.api_key_env).unwrap_or_default(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Provider for MistralProvider {
    fn name(&self) -> &'static str {
        "mistral"
    }

    async fn attempt(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(ScigraphError::Extraction(
                "Mistral API key not set".to_string(),
            ));
        }
        let request = ChatRequest {
            model: self.model.clone(),
            messages: messages_for(prompt),
            temperature: TEMPERATURE,
            response_format: None,
        };
        post_chat(
            &self.client,
            &format!("{}/v1/chat/completions", self.api_url),
            &self.api_key,
            self.name(),
            &request,
        )
        .await
    }

    async fn healthcheck(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ScigraphError::Extraction(
                "Mistral API key not set".to_string(),
            ));
        }
        let response = self
            .client
            .get(format!("{}/v1/models", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| ScigraphError::Extraction(format!("mistral unreachable: {}", e)))?;
        if !response.status().is_success() {
            return Err(ScigraphError::Extraction(format!(
                "mistral responded with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
