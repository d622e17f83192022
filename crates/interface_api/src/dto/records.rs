//! DTOs for documents, communications, notes and stakeholders

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use domain_cases::{CommunicationChannel, Direction, DocumentCategory, NoteKind, StakeholderRole};

/// Metadata for an uploaded file; the bytes go straight to object storage
#[derive(Debug, Deserialize, Validate)]
pub struct AddDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 127))]
    pub content_type: String,
    pub size_bytes: u64,
    pub category: DocumentCategory,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommunicationRequest {
    pub channel: CommunicationChannel,
    pub direction: Direction,
    #[validate(length(min = 1, max = 200))]
    pub contact: String,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(max = 10000))]
    pub summary: String,
    /// Defaults to now
    pub occurred_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddNoteRequest {
    #[serde(default)]
    pub kind: NoteKind,
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddStakeholderRequest {
    pub role: StakeholderRole,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub organisation: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}
