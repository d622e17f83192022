//! RTW plan and compensation handlers

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use core_kernel::CaseId;
use domain_cases::{Compensation, RtwPlan};

use crate::auth::CurrentUser;
use crate::dto::plans::*;
use crate::{error::ApiError, AppState};

/// Creates or updates the case's RTW plan
pub async fn save_plan(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SavePlanRequest>,
) -> Result<Json<RtwPlan>, ApiError> {
    request.validate()?;

    let id = CaseId::from(id);
    let case = state.cases.get(id).await?.value;
    let mut plan = case.rtw_plan.unwrap_or_else(|| RtwPlan::draft(id));
    request.apply_to(&mut plan);
    plan.updated_at = Utc::now();

    Ok(Json(state.cases.save_plan(plan).await?))
}

/// Reports which required fields still block printing
pub async fn validate_plan(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanValidationResponse>, ApiError> {
    let id = CaseId::from(id);
    let case = state.cases.get(id).await?.value;
    let plan = case.rtw_plan.clone().unwrap_or_else(|| RtwPlan::draft(id));

    let missing = plan.missing_required_fields(&case);
    Ok(Json(PlanValidationResponse {
        complete: missing.is_empty(),
        missing,
    }))
}

/// Printable plan as plain text; refused with 422 while fields are missing
pub async fn print_plan(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let text = state.cases.printable_plan(CaseId::from(id)).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

/// Records pre-injury earnings and recalculates PIAWE
pub async fn set_compensation(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CompensationRequest>,
) -> Result<Json<CompensationResponse>, ApiError> {
    request.validate()?;

    let mut compensation = Compensation::with_earnings(request.weekly_earnings);
    let piawe = compensation.calculate_piawe()?;
    let case = state.cases.set_compensation(CaseId::from(id), compensation).await?;

    let weeks = case.weeks_since_injury(Utc::now().date_naive());
    Ok(Json(CompensationResponse {
        piawe,
        weekly_earnings: case.compensation.weekly_earnings.clone(),
        weeks_since_injury: weeks,
        weekly_entitlement: case.compensation.weekly_entitlement(weeks),
    }))
}
