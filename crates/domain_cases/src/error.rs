//! Case domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the case domain
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Case not found: {0}")]
    CaseNotFound(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("{entity} not found: {id}")]
    RecordNotFound { entity: String, id: String },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Claim number already in use: {0}")]
    DuplicateClaimNumber(String),

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("RTW plan is missing required fields: {}", missing.join(", "))]
    IncompletePlan { missing: Vec<String> },

    #[error("Case has no RTW plan")]
    NoPlan,

    #[error(transparent)]
    Port(PortError),
}

impl CaseError {
    pub fn validation(message: impl Into<String>) -> Self {
        CaseError::Validation(message.into())
    }

    /// Returns true for any of the "not found" variants
    pub fn is_not_found(&self) -> bool {
        match self {
            CaseError::CaseNotFound(_)
            | CaseError::ProfileNotFound(_)
            | CaseError::RecordNotFound { .. } => true,
            CaseError::Port(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<PortError> for CaseError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => match entity_type.as_str() {
                "Case" => CaseError::CaseNotFound(id),
                "Profile" => CaseError::ProfileNotFound(id),
                _ => CaseError::RecordNotFound { entity: entity_type, id },
            },
            PortError::Validation { message, .. } => CaseError::Validation(message),
            other => CaseError::Port(other),
        }
    }
}
