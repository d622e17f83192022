//! AI collaborator configuration

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Substrings that mark a key copied from setup docs rather than a real one
const PLACEHOLDER_MARKERS: [&str; 3] = ["your-", "placeholder", "changeme"];

/// Masked keys such as `sk-xxxxxxxx` start with this after any `sk-` prefix
const MASKED_KEY_PREFIX: &str = "xxx";

#[derive(Clone, Deserialize)]
pub struct AssistConfig {
    /// Bearer key for the completion endpoint
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl AssistConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The key with surrounding whitespace removed, if one is set
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// True when a usable (non-empty, non-placeholder) key is present
    pub fn is_configured(&self) -> bool {
        match self.api_key() {
            None => false,
            Some(key) => {
                let lower = key.to_ascii_lowercase();
                let body = lower.strip_prefix("sk-").unwrap_or(&lower);
                !body.starts_with(MASKED_KEY_PREFIX)
                    && !PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for AssistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
