//! Case handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{CaseId, ProfileId};
use domain_cases::{Case, DeletionSummary};

use crate::auth::CurrentUser;
use crate::dto::cases::*;
use crate::{error::ApiError, AppState};

/// Lists every case, newest first
pub async fn list_cases(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<CaseListResponse>, ApiError> {
    let fetched = state.cases.refresh().await?;
    Ok(Json(CaseListResponse {
        cases: fetched.value.iter().map(CaseSummary::from).collect(),
        stale: fetched.stale,
    }))
}

/// Opens a new case
pub async fn create_case(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<Case>), ApiError> {
    request.validate()?;

    let case_manager_id = request.case_manager_id.map(ProfileId::from).unwrap_or(user.id);
    let mut case = Case::open(
        request.claim_number,
        request.worker.into(),
        request.employer.into(),
        request.injury.into(),
        case_manager_id,
    )?;
    if let Some(priority) = request.priority {
        case.priority = priority;
    }

    let created = state.cases.create(case, &user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Gets a case with all of its child records
pub async fn get_case(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CaseDetailResponse>, ApiError> {
    let fetched = state.cases.get(CaseId::from(id)).await?;
    Ok(Json(CaseDetailResponse {
        case: fetched.value,
        stale: fetched.stale,
    }))
}

/// Edits worker, employer, injury or priority
pub async fn update_case(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCaseRequest>,
) -> Result<Json<Case>, ApiError> {
    request.validate()?;

    let mut case = state.cases.get(CaseId::from(id)).await?.value;
    request.apply_to(&mut case);
    if case.injury.date > Utc::now().date_naive() {
        return Err(ApiError::Validation("Injury date cannot be in the future".to_string()));
    }
    case.updated_at = Utc::now();

    Ok(Json(state.cases.update(case).await?))
}

/// Deletes a case and every record attached to it
pub async fn delete_case(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionSummary>, ApiError> {
    Ok(Json(state.cases.delete(CaseId::from(id), &user).await?))
}

/// Moves the case through its lifecycle
pub async fn update_status(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Case>, ApiError> {
    Ok(Json(state.cases.update_status(CaseId::from(id), request.status).await?))
}

/// Reassigns the case
pub async fn assign_case_manager(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignCaseManagerRequest>,
) -> Result<Json<Case>, ApiError> {
    let case = state
        .cases
        .assign_case_manager(CaseId::from(id), ProfileId::from(request.case_manager_id))
        .await?;
    Ok(Json(case))
}
