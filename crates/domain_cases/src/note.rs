//! Case notes and supervisor notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CaseId, NoteId, ProfileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    #[default]
    General,
    /// Written by a supervisor; only supervisors and admins may add these
    Supervisor,
}

/// A free-text note on a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseNote {
    pub id: NoteId,
    pub case_id: CaseId,
    pub kind: NoteKind,
    pub author_id: ProfileId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl CaseNote {
    pub fn new(case_id: CaseId, kind: NoteKind, author_id: ProfileId, body: impl Into<String>) -> Self {
        Self {
            id: NoteId::new_v7(),
            case_id,
            kind,
            author_id,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}
