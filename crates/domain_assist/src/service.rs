//! Assist service
//!
//! Entry point for AI guidance. Holds the optional completion client, the
//! persisted model choice, and the shared connection status.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use domain_cases::Case;

use crate::client::{ChatMessage, CompletionClient, OpenAiCompletionClient};
use crate::config::AssistConfig;
use crate::error::AssistError;
use crate::monitor::{ConnectionStatus, SharedStatus};
use crate::parser::{parse_insights, parse_plan_response, Insights, PlanSuggestion};
use crate::prompt::{chat_messages, insights_prompt, plan_prompt};
use crate::settings::{SettingsStore, AVAILABLE_MODELS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistStatus {
    pub configured: bool,
    pub connection: ConnectionStatus,
    pub model: String,
    pub available_models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub model: String,
}

pub struct AssistService {
    client: Option<Arc<dyn CompletionClient>>,
    settings: Arc<SettingsStore>,
    connection: SharedStatus,
}

impl AssistService {
    /// Builds the service; an unusable key yields a disabled service, not an error
    pub fn from_config(config: &AssistConfig, settings: Arc<SettingsStore>) -> Self {
        match OpenAiCompletionClient::new(config) {
            Ok(client) => Self::with_client(Arc::new(client), settings),
            Err(e) => {
                warn!(error = %e, "AI features disabled");
                Self::disabled(settings)
            }
        }
    }

    pub fn with_client(client: Arc<dyn CompletionClient>, settings: Arc<SettingsStore>) -> Self {
        Self {
            client: Some(client),
            settings,
            connection: Arc::new(RwLock::new(ConnectionStatus::Unknown)),
        }
    }

    pub fn disabled(settings: Arc<SettingsStore>) -> Self {
        Self {
            client: None,
            settings,
            connection: Arc::new(RwLock::new(ConnectionStatus::NotConfigured)),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<Arc<dyn CompletionClient>> {
        self.client.clone()
    }

    /// Shared status handle for a `ConnectionMonitor`
    pub fn connection_handle(&self) -> SharedStatus {
        self.connection.clone()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub async fn status(&self) -> AssistStatus {
        AssistStatus {
            configured: self.is_configured(),
            connection: *self.connection.read().await,
            model: self.settings.current().await.model,
            available_models: AVAILABLE_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<(String, String), AssistError> {
        let client = self.client.as_ref().ok_or(AssistError::NotConfigured)?;
        let model = self.settings.current().await.model;

        match client.complete(&messages, &model).await {
            Ok(text) => {
                *self.connection.write().await = ConnectionStatus::Connected;
                Ok((text, model))
            }
            Err(e) => {
                if let Some(status) = ConnectionStatus::from_error(&e) {
                    *self.connection.write().await = status;
                }
                warn!(model = %model, error = %e, "AI request failed");
                Err(e)
            }
        }
    }

    #[instrument(skip(self, case), fields(case_id = %case.id))]
    pub async fn suggest_plan(&self, case: &Case) -> Result<PlanSuggestion, AssistError> {
        let (text, _) = self.complete(plan_prompt(case)).await?;
        let suggestion = parse_plan_response(&text);
        if suggestion.is_empty() {
            warn!("AI plan response had no recognisable sections");
        }
        info!(
            duties = suggestion.fields.suitable_duties.len(),
            restrictions = suggestion.fields.restrictions.len(),
            hours_detected = suggestion.hours_detected,
            "AI plan suggestion parsed"
        );
        Ok(suggestion)
    }

    #[instrument(skip(self, case), fields(case_id = %case.id))]
    pub async fn generate_insights(&self, case: &Case) -> Result<Insights, AssistError> {
        let (text, _) = self.complete(insights_prompt(case)).await?;
        Ok(parse_insights(&text))
    }

    #[instrument(skip(self, case, history, question), fields(case_id = %case.id, turns = history.len()))]
    pub async fn chat(
        &self,
        case: &Case,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<ChatReply, AssistError> {
        let (reply, model) = self.complete(chat_messages(case, history, question)).await?;
        Ok(ChatReply { reply, model })
    }
}
