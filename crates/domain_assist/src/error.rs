//! AI guidance errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors from the AI completion collaborator
#[derive(Debug, Error)]
pub enum AssistError {
    /// No usable API key; AI features are disabled
    #[error("AI assistant is not configured")]
    NotConfigured,

    /// Upstream rejected the API key (HTTP 401)
    #[error("AI provider rejected the API key")]
    Authentication,

    /// Upstream rate limit hit (HTTP 429)
    #[error("AI provider rate limit exceeded")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-success response
    #[error("AI provider error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Could not reach AI provider: {0}")]
    Network(String),

    #[error("AI provider timed out")]
    Timeout,

    #[error("AI provider returned an empty response")]
    EmptyResponse,

    #[error("Invalid model '{0}'")]
    UnknownModel(String),

    #[error("Failed to persist AI settings: {0}")]
    Settings(String),
}

impl AssistError {
    /// Message suitable for showing to a case manager
    pub fn user_message(&self) -> &'static str {
        match self {
            AssistError::NotConfigured => {
                "AI assistance is not set up. Add a valid API key to RTW_AI_API_KEY and restart the service."
            }
            AssistError::Authentication => {
                "The AI service rejected the configured API key. Check that the key is valid and active."
            }
            AssistError::RateLimited { .. } => {
                "The AI service is receiving too many requests. Please wait a moment and try again."
            }
            AssistError::Api { .. } | AssistError::EmptyResponse => {
                "The AI service could not complete the request. Please try again."
            }
            AssistError::Network(_) | AssistError::Timeout => {
                "The AI service could not be reached. Check your connection and try again."
            }
            AssistError::UnknownModel(_) => "The selected AI model is not available.",
            AssistError::Settings(_) => "AI settings could not be saved.",
        }
    }
}

impl From<AssistError> for PortError {
    fn from(err: AssistError) -> Self {
        match err {
            AssistError::NotConfigured => PortError::ServiceUnavailable {
                service: "ai-completion (not configured)".to_string(),
            },
            AssistError::Authentication => PortError::Unauthorized {
                message: err.to_string(),
            },
            AssistError::RateLimited { retry_after_secs } => PortError::RateLimited {
                retry_after_secs: retry_after_secs.unwrap_or(60),
            },
            AssistError::Network(message) => PortError::connection(message),
            AssistError::Timeout => PortError::Timeout {
                operation: "ai completion".to_string(),
                duration_ms: 0,
            },
            AssistError::UnknownModel(_) => PortError::validation(err.to_string()),
            other => PortError::internal(other.to_string()),
        }
    }
}
