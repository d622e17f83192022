//! Communication log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CaseId, CommunicationId, ProfileId};

/// How the communication happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationChannel {
    Phone,
    Email,
    Meeting,
    Letter,
    Sms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// A logged communication with someone involved in the case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    pub id: CommunicationId,
    pub case_id: CaseId,
    pub channel: CommunicationChannel,
    pub direction: Direction,
    /// Who the case manager spoke with
    pub contact: String,
    pub subject: String,
    pub summary: String,
    pub occurred_at: DateTime<Utc>,
    pub logged_by: ProfileId,
}

impl Communication {
    pub fn new(
        case_id: CaseId,
        channel: CommunicationChannel,
        direction: Direction,
        contact: impl Into<String>,
        subject: impl Into<String>,
        summary: impl Into<String>,
        logged_by: ProfileId,
    ) -> Self {
        Self {
            id: CommunicationId::new_v7(),
            case_id,
            channel,
            direction,
            contact: contact.into(),
            subject: subject.into(),
            summary: summary.into(),
            occurred_at: Utc::now(),
            logged_by,
        }
    }

    /// Sets when the communication took place
    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }
}
