//! Completion client
//!
//! `CompletionClient` is the seam between the assist service and whatever
//! answers chat prompts. `OpenAiCompletionClient` talks to any
//! OpenAI-compatible `/chat/completions` endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AssistConfig;
use crate::error::AssistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// Something that turns chat messages into a completion
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends the messages and returns the first choice's text
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String, AssistError>;

    /// Cheap authenticated request used for connectivity checks
    async fn check_connection(&self) -> Result<(), AssistError>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for OpenAI-compatible chat completion APIs
pub struct OpenAiCompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompletionClient {
    /// Builds a client; fails with `NotConfigured` when the key is unusable
    pub fn new(config: &AssistConfig) -> Result<Self, AssistError> {
        let api_key = match config.api_key() {
            Some(key) if config.is_configured() => key.to_string(),
            _ => return Err(AssistError::NotConfigured),
        };

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AssistError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn error_from_response(response: Response) -> AssistError {
        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => AssistError::Authentication,
            StatusCode::TOO_MANY_REQUESTS => AssistError::RateLimited { retry_after_secs },
            _ => {
                let message = serde_json::from_str::<ErrorEnvelope>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                AssistError::Api { status: status.as_u16(), message }
            }
        }
    }
}

fn transport_error(err: reqwest::Error) -> AssistError {
    if err.is_timeout() {
        AssistError::Timeout
    } else {
        AssistError::Network(err.to_string())
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<String, AssistError> {
        let start = Instant::now();
        let request = ChatCompletionRequest {
            model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let err = Self::error_from_response(response).await;
            warn!(model, error = %err, "Completion request failed");
            return Err(err);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistError::Api { status: 200, message: format!("malformed response: {e}") })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AssistError::EmptyResponse)?;

        debug!(
            model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Completion received"
        );
        Ok(content)
    }

    async fn check_connection(&self) -> Result<(), AssistError> {
        let response = self
            .client
            .get(self.url("models"))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(response).await)
        }
    }
}
