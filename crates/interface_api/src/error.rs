//! API error handling

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use validator::{ValidationErrors, ValidationErrorsKind};

use core_kernel::PortError;
use domain_assist::AssistError;
use domain_cases::CaseError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation failure listing every offending field
    #[error("Validation error: {message}")]
    InvalidFields { message: String, details: Vec<String> },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Rate limited: {message}")]
    RateLimited { message: String, retry_after_secs: Option<u64> },

    #[error("Upstream error: {0}")]
    BadGateway(String),

    #[error("Upstream timeout: {0}")]
    GatewayTimeout(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string(), None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg, None),
            ApiError::InvalidFields { message, details } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message, Some(details))
            }
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg, None),
            ApiError::RateLimited { message, retry_after_secs } => {
                retry_after = retry_after_secs;
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited", message, None)
            }
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg, None),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "upstream_timeout", msg, None),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<CaseError> for ApiError {
    fn from(err: CaseError) -> Self {
        match err {
            CaseError::CaseNotFound(_)
            | CaseError::ProfileNotFound(_)
            | CaseError::RecordNotFound { .. }
            | CaseError::NoPlan => ApiError::NotFound(err.to_string()),
            CaseError::InvalidStatusTransition { .. } | CaseError::DuplicateClaimNumber(_) => {
                ApiError::Conflict(err.to_string())
            }
            CaseError::Validation(msg) => ApiError::Validation(msg),
            CaseError::Forbidden(msg) => ApiError::Forbidden(msg),
            CaseError::IncompletePlan { missing } => ApiError::InvalidFields {
                message: "RTW plan is missing required fields".to_string(),
                details: missing,
            },
            CaseError::Port(port) => port.into(),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match &err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, .. } => ApiError::Validation(message.clone()),
            PortError::Conflict { message } => ApiError::Conflict(message.clone()),
            PortError::RateLimited { retry_after_secs } => ApiError::RateLimited {
                message: err.to_string(),
                retry_after_secs: Some(*retry_after_secs),
            },
            PortError::Timeout { .. } => ApiError::GatewayTimeout(err.to_string()),
            PortError::Connection { .. }
            | PortError::ServiceUnavailable { .. }
            | PortError::Unauthorized { .. } => {
                warn!(error = %err, "Backend unavailable");
                ApiError::ServiceUnavailable("Case storage is currently unavailable".to_string())
            }
            PortError::Internal { .. } => {
                error!(error = %err, "Internal backend error");
                ApiError::Internal("An unexpected error occurred".to_string())
            }
        }
    }
}

impl From<AssistError> for ApiError {
    fn from(err: AssistError) -> Self {
        warn!(error = %err, "AI request failed");
        let message = err.user_message().to_string();
        match err {
            AssistError::NotConfigured | AssistError::Network(_) => ApiError::ServiceUnavailable(message),
            AssistError::RateLimited { retry_after_secs } => ApiError::RateLimited { message, retry_after_secs },
            AssistError::Authentication | AssistError::Api { .. } | AssistError::EmptyResponse => {
                ApiError::BadGateway(message)
            }
            AssistError::Timeout => ApiError::GatewayTimeout(message),
            AssistError::UnknownModel(model) => ApiError::Validation(format!("{message} ({model})")),
            AssistError::Settings(_) => ApiError::Internal(message),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::Unauthorized
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_field_errors("", &errors, &mut details);
        details.sort();
        ApiError::InvalidFields {
            message: "Request failed validation".to_string(),
            details,
        }
    }
}

/// Flattens nested validator output into `path: message` lines
fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for e in list {
                    let message = e.message.as_deref().unwrap_or(&e.code);
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_errors_map_to_statuses() {
        let status = |e: CaseError| ApiError::from(e).into_response().status();

        assert_eq!(status(CaseError::CaseNotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(CaseError::DuplicateClaimNumber("WC-1".into())), StatusCode::CONFLICT);
        assert_eq!(
            status(CaseError::InvalidStatusTransition { from: "new".into(), to: "closed".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(status(CaseError::Forbidden("no".into())), StatusCode::FORBIDDEN);
        assert_eq!(
            status(CaseError::IncompletePlan { missing: vec!["goal".into()] }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_assist_errors_map_to_statuses() {
        let status = |e: AssistError| ApiError::from(e).into_response().status();

        assert_eq!(status(AssistError::NotConfigured), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status(AssistError::Authentication), StatusCode::BAD_GATEWAY);
        assert_eq!(status(AssistError::Timeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status(AssistError::UnknownModel("gpt-9".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_rate_limit_sets_retry_after() {
        let response = ApiError::from(AssistError::RateLimited { retry_after_secs: Some(12) }).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "12");
    }

    #[test]
    fn test_transient_port_error_is_unavailable() {
        let err = CaseError::Port(PortError::Connection { message: "refused".into(), source: None });
        assert_eq!(ApiError::from(err).into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
