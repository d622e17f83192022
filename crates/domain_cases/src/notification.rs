//! In-app notifications for case managers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CaseId, NotificationId, ProfileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    CaseAssigned,
    CaseUpdated,
    PlanReady,
    DocumentUploaded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: ProfileId,
    /// Cleared when the case is deleted
    pub case_id: Option<CaseId>,
    pub kind: NotificationKind,
    pub message: String,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: ProfileId,
        case_id: Option<CaseId>,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new_v7(),
            recipient_id,
            case_id,
            kind,
            message: message.into(),
            read_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    pub fn mark_read(&mut self) {
        if self.read_at.is_none() {
            self.read_at = Some(Utc::now());
        }
    }
}
