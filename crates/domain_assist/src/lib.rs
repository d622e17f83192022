//! AI Guidance for RTW Cases
//!
//! Builds a case-context prompt, sends it to an OpenAI-compatible completion
//! endpoint, and turns the free-text answer back into plan fields.
//!
//! ```text
//! Case ──► prompt ──► CompletionClient ──► text ──► parser ──► PlanSuggestion
//!                          │                                  Insights
//!                          ▼
//!                  ConnectionStatus ◄── ConnectionMonitor (polling)
//! ```
//!
//! Nothing here retries. A missing or placeholder API key turns every
//! operation into `AssistError::NotConfigured` without touching the network.

pub mod config;
pub mod error;
pub mod client;
pub mod prompt;
pub mod parser;
pub mod settings;
pub mod monitor;
pub mod service;

pub use config::AssistConfig;
pub use error::AssistError;
pub use client::{ChatMessage, ChatRole, CompletionClient, OpenAiCompletionClient};
pub use parser::{parse_plan_response, parse_insights, extract_base_hours, PlanSuggestion, Insights};
pub use prompt::CaseContext;
pub use settings::{AssistSettings, SettingsStore, AVAILABLE_MODELS};
pub use monitor::{ConnectionMonitor, ConnectionStatus};
pub use service::{AssistService, AssistStatus, ChatReply};
