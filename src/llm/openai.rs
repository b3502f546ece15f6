//! OpenAI chat provider: the default path when no other provider is
//! configured at all.

use crate::config::OpenAiConfig;
use crate::error::{Result, ScigraphError};
use crate::llm::chat::{messages_for, post_chat, ChatRequest};
use crate::llm::{Provider, TEMPERATURE};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            api_key: std::env::var(&config.api_key_env).unwrap_or_default(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn attempt(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(ScigraphError::Extraction(
                "OpenAI API key not set".to_string(),
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
            OPENAI_CHAT_URL,
            &self.api_key,
            self.name(),
            &request,
        )
        .await
    }

    async fn healthcheck(&self) -> Result<()> {
        // Key presence only; a live call would cost money on every start
        if self.api_key.is_empty() {
            return Err(ScigraphError::Extraction(
                "OpenAI API key not set".to_string(),
            ));
        }
        Ok(())
    }
}
