use super::{ChatModel, CompletionOptions};
use crate::config::ChatConfig;
use crate::error::{Result, ServiceError};
use crate::interview::Turn;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, messages: &'a [Turn], options: &CompletionOptions) -> Self {
        Self {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

/// Groq chat completions (OpenAI-compatible API)
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: impl Into<String>, cfg: &ChatConfig) -> Self {
        Self::with_client(Client::new(), api_key, cfg)
    }

    pub fn with_client(client: Client, api_key: impl Into<String>, cfg: &ChatConfig) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, messages: &[Turn], options: &CompletionOptions) -> Result<String> {
        let request = ChatRequest::new(&self.model, messages, options);

        info!(
            "Sending {} messages to Groq model {} (json_mode={})",
            messages.len(),
            self.model,
            options.json_mode
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::Completion(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Groq API error: {} {}", status, body);
            return Err(ServiceError::Completion(format!("HTTP {}: {}", status, body)));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Completion(e.to_string()))?;

        if let Some(usage) = &chat.usage {
            debug!(
                "Token usage - Prompt: {}, Completion: {}, Total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        first_content(chat)
    }
}

fn first_content(chat: ChatResponse) -> Result<String> {
    let choice = chat
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::Completion("no choices in response".to_string()))?;

    choice
        .message
        .content
        .ok_or_else(|| ServiceError::Completion("first choice has no content".to_string()))
}
