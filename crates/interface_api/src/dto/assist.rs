//! AI assistance and settings DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_assist::{ChatMessage, PlanSuggestion};
use domain_cases::RtwPlan;

#[derive(Debug, Default, Deserialize)]
pub struct SuggestPlanQuery {
    /// Write the suggestion into the case's plan
    #[serde(default)]
    pub apply: bool,
}

#[derive(Debug, Serialize)]
pub struct PlanSuggestionResponse {
    pub suggestion: PlanSuggestion,
    /// The saved plan, when the suggestion was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<RtwPlan>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    /// Earlier turns of this conversation, oldest first
    #[serde(default)]
    #[validate(length(max = 100))]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SelectModelRequest {
    #[validate(length(min = 1, max = 100))]
    pub model: String,
}
