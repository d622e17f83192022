//! AI assistance and AI settings handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::CaseId;
use domain_assist::{AssistStatus, ChatReply, Insights};

use crate::auth::CurrentUser;
use crate::dto::assist::*;
use crate::{error::ApiError, AppState};

/// Suggests RTW plan fields for the case
///
/// With `?apply=true` the suggested duties, restrictions and schedule are
/// written into the case's plan.
pub async fn suggest_plan(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Query(query): Query<SuggestPlanQuery>,
) -> Result<Json<PlanSuggestionResponse>, ApiError> {
    let id = CaseId::from(id);
    let case = state.cases.get(id).await?.value;
    let suggestion = state.assist.suggest_plan(&case).await?;

    let plan = if query.apply {
        Some(state.cases.apply_plan_suggestion(id, &suggestion.fields).await?)
    } else {
        None
    };

    Ok(Json(PlanSuggestionResponse { suggestion, plan }))
}

/// Summarises the case and lists key points
pub async fn generate_insights(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Insights>, ApiError> {
    let case = state.cases.get(CaseId::from(id)).await?.value;
    Ok(Json(state.assist.generate_insights(&case).await?))
}

/// Answers a free-form question about the case
pub async fn chat(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    request.validate()?;

    let case = state.cases.get(CaseId::from(id)).await?.value;
    let reply = state.assist.chat(&case, &request.history, &request.message).await?;
    Ok(Json(reply))
}

/// Current AI configuration and connectivity
pub async fn ai_settings(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Json<AssistStatus> {
    Json(state.assist.status().await)
}

/// Persists the model used for subsequent AI requests
pub async fn select_model(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(request): Json<SelectModelRequest>,
) -> Result<Json<AssistStatus>, ApiError> {
    request.validate()?;

    state.assist.settings().select_model(request.model.trim()).await?;
    Ok(Json(state.assist.status().await))
}
