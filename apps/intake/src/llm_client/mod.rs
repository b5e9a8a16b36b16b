//! LLM Client: the single point of entry for all chat-completion calls.
//!
//! No other module may call the model API directly.
//!
//! Model: gpt-4 at temperature 0.2 (hardcoded)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for order extraction.
pub const MODEL: &str = "gpt-4";
const TEMPERATURE: f32 = 0.2;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl LlmResponse {
    /// Text of the first choice, if the model returned any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Wraps the chat-completions endpoint. A single attempt per call; the caller
/// turns any failure into a user-facing "try again" reply.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            api_url,
        })
    }

    /// Sends `prompt` as a single user message and returns the full response object.
    pub async fn call(&self, prompt: &str) -> Result<LlmResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let llm_response: LlmResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &llm_response.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(llm_response)
    }

    /// Calls the model and returns the trimmed text of the first choice.
    pub async fn call_text(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;
        response
            .text()
            .map(|t| t.trim().to_string())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Pulls `error.message` out of an API error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
