//! Handlers for records attached to a case

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{CaseId, StakeholderId};
use domain_cases::{CaseNote, Communication, Document, Stakeholder};

use crate::auth::CurrentUser;
use crate::dto::records::*;
use crate::{error::ApiError, AppState};

/// Records metadata for an uploaded document
pub async fn add_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    request.validate()?;

    let document = Document::new(
        CaseId::from(id),
        request.file_name,
        request.content_type,
        request.size_bytes,
        request.category,
        user.id,
    )?;
    let saved = state.cases.add_document(document).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn list_documents(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Document>>, ApiError> {
    Ok(Json(state.cases.list_documents(CaseId::from(id)).await?))
}

/// Logs a call, email, meeting or letter
pub async fn add_communication(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddCommunicationRequest>,
) -> Result<(StatusCode, Json<Communication>), ApiError> {
    request.validate()?;

    let mut communication = Communication::new(
        CaseId::from(id),
        request.channel,
        request.direction,
        request.contact,
        request.subject,
        request.summary,
        user.id,
    );
    if let Some(at) = request.occurred_at {
        communication = communication.at(at);
    }
    let saved = state.cases.add_communication(communication).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn add_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddNoteRequest>,
) -> Result<(StatusCode, Json<CaseNote>), ApiError> {
    request.validate()?;

    let note = CaseNote::new(CaseId::from(id), request.kind, user.id, request.body);
    let saved = state.cases.add_note(note, &user).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn add_stakeholder(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddStakeholderRequest>,
) -> Result<(StatusCode, Json<Stakeholder>), ApiError> {
    request.validate()?;

    let mut stakeholder = Stakeholder::new(CaseId::from(id), request.role, request.name);
    stakeholder.organisation = request.organisation;
    stakeholder.phone = request.phone;
    stakeholder.email = request.email;

    let saved = state.cases.add_stakeholder(stakeholder).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn remove_stakeholder(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path((id, stakeholder_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .cases
        .remove_stakeholder(CaseId::from(id), StakeholderId::from(stakeholder_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
