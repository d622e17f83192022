//! Persisted AI settings
//!
//! The selected model survives restarts in a small JSON file. Loading never
//! fails: a missing or unreadable file falls back to defaults.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::AssistError;

/// Models a user may select
pub const AVAILABLE_MODELS: [&str; 4] = ["gpt-4o-mini", "gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistSettings {
    pub model: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AssistSettings {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self { model: model.into(), updated_at: None }
    }
}

#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    current: RwLock<AssistSettings>,
}

impl SettingsStore {
    /// Settings kept only for the life of the process
    pub fn in_memory(default_model: &str) -> Self {
        Self {
            path: None,
            current: RwLock::new(AssistSettings::with_model(default_model)),
        }
    }

    /// Loads settings from `path`, defaulting to `default_model`
    pub fn load(path: impl Into<PathBuf>, default_model: &str) -> Self {
        let path = path.into();
        let settings = match read_settings(&path) {
            Ok(Some(settings)) if is_available(&settings.model) => settings,
            Ok(Some(settings)) => {
                warn!(model = %settings.model, "Persisted AI model is no longer available, using default");
                AssistSettings::with_model(default_model)
            }
            Ok(None) => AssistSettings::with_model(default_model),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable AI settings file");
                AssistSettings::with_model(default_model)
            }
        };

        Self {
            path: Some(path),
            current: RwLock::new(settings),
        }
    }

    pub async fn current(&self) -> AssistSettings {
        self.current.read().await.clone()
    }

    /// Validates and persists a new model choice
    pub async fn select_model(&self, model: &str) -> Result<AssistSettings, AssistError> {
        if !is_available(model) {
            return Err(AssistError::UnknownModel(model.to_string()));
        }

        let mut current = self.current.write().await;
        let updated = AssistSettings {
            model: model.to_string(),
            updated_at: Some(Utc::now()),
        };

        if let Some(path) = &self.path {
            let json = serde_json::to_vec_pretty(&updated)
                .map_err(|e| AssistError::Settings(e.to_string()))?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AssistError::Settings(e.to_string()))?;
            }
            tokio::fs::write(path, json)
                .await
                .map_err(|e| AssistError::Settings(e.to_string()))?;
        }

        info!(model, "AI model selected");
        *current = updated.clone();
        Ok(updated)
    }
}

pub fn is_available(model: &str) -> bool {
    AVAILABLE_MODELS.contains(&model)
}

fn read_settings(path: &Path) -> Result<Option<AssistSettings>, String> {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| e.to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}
