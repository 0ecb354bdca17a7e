use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::traits::ChatModel;
use super::types::{ChatMessage, ModelParams, ModelResponse, TokenUsage};
use crate::constants::HTTP_REQUEST_TIMEOUT_SECS;

/// Chat client for OpenAI-compatible completions endpoints
///
/// Groq, OpenAI and local Ollama-style servers all speak the same wire
/// format; only the base URL, model id and credential differ.
pub struct OpenAiCompatModel {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model_id: String,
    params: ModelParams,
}

impl OpenAiCompatModel {
    pub fn new(
        base_url: impl Into<String>,
        model_id: impl Into<String>,
        api_key: Option<String>,
        params: ModelParams,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url,
            api_key,
            model_id: model_id.into(),
            params,
        })
    }

    fn build_request_body(&self, messages: &[ChatMessage]) -> Value {
        let json_messages: Vec<Value> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content,
                })
            })
            .collect();

        json!({
            "model": self.model_id,
            "messages": json_messages,
            "temperature": self.params.temperature,
            "max_tokens": self.params.max_tokens,
            "top_p": self.params.top_p,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<ModelResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = self.build_request_body(messages);

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} returned {}: {}", self.model_id, status, error_text);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Malformed chat completion response")?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .context("Chat completion response contained no choices")?;

        Ok(ModelResponse {
            content: choice.message.content,
            usage: completion.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model_name: self.model_id.clone(),
        })
    }

    fn name(&self) -> &str {
        &self.model_id
    }

    fn is_local(&self) -> bool {
        // No credential means a locally served endpoint
        self.api_key.is_none()
    }
}

// Response structures for the chat completions endpoint (OpenAI format)

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}
