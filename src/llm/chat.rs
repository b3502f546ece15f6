//! Shared request/response shapes for OpenAI-compatible chat APIs
//! (Groq, Mistral, OpenAI all speak this dialect).

use crate::error::{Result, ScigraphError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageBody,
}

#[derive(Deserialize)]
struct MessageBody {
    content: String,
}

/// Standard system + user message pair used by every chat provider.
pub(crate) fn messages_for(prompt: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system",
            content: super::SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user",
            content: prompt.to_string(),
        },
    ]
}

/// POST a chat completion and return the first choice's content.
/// Non-2xx statuses and empty choice lists are provider failures.
pub(crate) async fn post_chat(
    client: &Client,
    url: &str,
    api_key: &str,
    provider: &str,
    request: &ChatRequest,
) -> Result<String> {
    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await
        .map_err(|e| ScigraphError::Extraction(format!("{} network error: {}", provider, e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        return Err(ScigraphError::Extraction(format!(
            "{} API error {}: {}",
            provider, status, body
        )));
    }

    let result: ChatResponse = response
        .json()
        .await
        .map_err(|e| ScigraphError::Extraction(format!("{} malformed response: {}", provider, e)))?;

    result
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| ScigraphError::Extraction(format!("{} returned no choices", provider)))
}
