//! API configuration

use std::time::Duration;

use serde::Deserialize;

use domain_assist::AssistConfig;

/// API configuration
///
/// Loaded from `RTW_`-prefixed environment variables. Anything unset keeps
/// its default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Shared secret used to verify HS256 tokens
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Required `aud` claim; unchecked when unset
    pub jwt_audience: Option<String>,
    /// PostgreSQL URL; the in-memory adapter is used when absent
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Log level
    pub log_level: String,
    /// File the selected AI model is persisted to
    pub settings_path: Option<String>,
    /// Completion API key
    pub ai_api_key: Option<String>,
    pub ai_base_url: String,
    /// Model used until the user selects another
    pub ai_model: String,
    /// Seconds between background connectivity checks
    pub ai_monitor_interval_secs: u64,
    /// Profile promoted to admin at startup
    pub admin_profile_id: Option<String>,
    pub admin_email: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            jwt_audience: None,
            database_url: None,
            database_max_connections: 10,
            log_level: "info".to_string(),
            settings_path: None,
            ai_api_key: None,
            ai_base_url: domain_assist::config::DEFAULT_BASE_URL.to_string(),
            ai_model: domain_assist::config::DEFAULT_MODEL.to_string(),
            ai_monitor_interval_secs: 300,
            admin_profile_id: None,
            admin_email: "admin@localhost".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("RTW"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Completion client settings derived from the `ai_*` fields
    pub fn assist_config(&self) -> AssistConfig {
        AssistConfig {
            api_key: self.ai_api_key.clone(),
            base_url: self.ai_base_url.clone(),
            model: self.ai_model.clone(),
            ..AssistConfig::default()
        }
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.ai_monitor_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_run_without_database() {
        let config = ApiConfig::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_assist_config_carries_ai_fields() {
        let config = ApiConfig {
            ai_api_key: Some("sk-live-123".to_string()),
            ai_model: "gpt-4o".to_string(),
            ..ApiConfig::default()
        };
        let assist = config.assist_config();
        assert!(assist.is_configured());
        assert_eq!(assist.model, "gpt-4o");
        assert_eq!(assist.max_tokens, AssistConfig::default().max_tokens);
    }
}
