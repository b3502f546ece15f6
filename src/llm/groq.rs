//! Groq chat provider: the fast primary backend when enabled.

use crate::config::GroqConfig;
use crate::error::{Result, ScigraphError};
use crate::llm::chat::{messages_for, post_chat, ChatRequest, ResponseFormat};
use crate::llm::{Provider, TEMPERATURE};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

pub struct GroqProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GroqProvider {
    pub fn new(config: &GroqConfig) -> Self {
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

    fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: messages_for(prompt),
            temperature: TEMPERATURE,
            // Groq supports forced JSON mode; use it
            response_format: Some(ResponseFormat { kind: "json_object" }),
        }
    }
}

#[async_trait]
impl Provider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn attempt(&self, prompt: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(ScigraphError::Extraction("Groq API key not set".to_string()));
        }
        post_chat(
            &self.client,
            GROQ_CHAT_URL,
            &self.api_key,
            self.name(),
            &self.request(prompt),
        )
        .await
    }

    async fn healthcheck(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ScigraphError::Extraction("Groq API key not set".to_string()));
        }
        // Minimal round-trip proves both the key and the model work
        let ping = ChatRequest {
            model: self.model.clone(),
            messages: messages_for("Ping"),
            temperature: TEMPERATURE,
            response_format: None,
        };
        post_chat(&self.client, GROQ_CHAT_URL, &self.api_key, self.name(), &ping).await?;
        Ok(())
    }
}
