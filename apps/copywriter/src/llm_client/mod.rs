//! LLM client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the provider API directly.
//! Generation code talks to a `ChatProvider`; `LlmClient` is the production one.
//!
//! No retries here: a failed call surfaces to the caller as-is.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

/// Default endpoint root for the OpenAI Chat Completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

/// One completion choice. Chat endpoints fill `message`, legacy
/// completion-style endpoints fill `text`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Reply text of the first choice: `message.content`, else `text`, else "".
    ///
    /// Empty strings fall through to the next location.
    pub fn text(&self) -> &str {
        let Some(first) = self.choices.first() else {
            return "";
        };

        first
            .message
            .as_ref()
            .and_then(|m| m.content.as_deref())
            .filter(|s| !s.is_empty())
            .or_else(|| first.text.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("")
    }
}

#[cfg(test)]
impl ChatResponse {
    /// A single-choice chat response carrying `content`.
    pub(crate) fn with_content(content: &str) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(ChoiceMessage {
                    content: Some(content.to_string()),
                }),
                text: None,
            }],
            usage: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// A chat-completion backend. Carried by the generator as `Arc<dyn ChatProvider>`
/// so tests can swap in a stub.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Production provider speaking the OpenAI Chat Completions wire format.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatProvider for LlmClient {
    /// Makes one call to the chat completions endpoint. Non-2xx statuses become
    /// `LlmError::Api`, carrying the provider's error message when it sent one.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                request.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat_response)
    }
}
