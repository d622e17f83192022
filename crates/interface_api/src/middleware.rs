//! API middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::auth::{validate_token, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Authentication middleware
///
/// Validates the bearer token and stores its claims in the request
/// extensions for `CurrentUser` and the audit log.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        warn!("Missing or invalid Authorization header");
        return Err(ApiError::Unauthorized);
    };

    match validate_token(token, &state.config.jwt_secret, state.config.jwt_audience.as_deref()) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(e) => {
            warn!(error = %e, "Token validation failed");
            Err(e.into())
        }
    }
}

/// Audit logging middleware
///
/// One structured line per API request: who, what, outcome and latency.
/// The request id is the `x-request-id` set by the outer request-id layer.
pub async fn audit_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let user_id = request
        .extensions()
        .get::<Claims>()
        .map(|c| c.sub.clone())
        .unwrap_or_else(|| "anonymous".to_string());

    let started = Instant::now();
    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        warn!(
            %method,
            %path,
            %request_id,
            user = %user_id,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "API request failed"
        );
    } else {
        info!(
            %method,
            %path,
            %request_id,
            user = %user_id,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "API request"
        );
    }

    response
}
