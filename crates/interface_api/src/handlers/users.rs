//! Current user handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{NotificationId, ProfileId};
use domain_cases::{CaseError, Notification, Profile};

use crate::auth::{Claims, CurrentUser};
use crate::dto::profiles::{ProvisionProfileRequest, SetRoleRequest};
use crate::{error::ApiError, AppState};

/// Profile of the authenticated user
///
/// Unlike the other routes a missing profile is reported as 404 here, so
/// clients can tell "signed in but not provisioned" apart from "forbidden".
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Profile>, ApiError> {
    let id = claims.profile_id()?;
    match state.profiles.current(id).await {
        Ok(profile) => Ok(Json(profile)),
        Err(CaseError::ProfileNotFound(_)) => Err(ApiError::NotFound(format!("No profile for user {}", id))),
        Err(e) => Err(e.into()),
    }
}

/// Creates or refreshes the caller's own profile
///
/// Works for a token with no profile yet; new users start as case managers.
pub async fn provision_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<ProvisionProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    request.validate()?;
    let id = claims.profile_id()?;
    Ok(Json(state.profiles.provision(id, request.full_name, request.email).await?))
}

/// Changes a user's role (admin only)
pub async fn set_role(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .profiles
        .set_role(&user, ProfileId::from(id), request.role)
        .await?;
    Ok(Json(profile))
}

/// Notifications for the authenticated user, newest first
pub async fn notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(state.profiles.notifications(user.id).await?))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .profiles
        .mark_notification_read(user.id, NotificationId::from(notification_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
