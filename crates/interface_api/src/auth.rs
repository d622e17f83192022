//! Authentication and the current-user extractor
//!
//! Tokens are issued by the hosted auth backend and verified here with the
//! shared HS256 secret. The subject is the user's profile id.

use std::str::FromStr;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::ProfileId;
use domain_cases::{CaseError, Profile};

use crate::error::ApiError;
use crate::AppState;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (profile ID)
    pub sub: String,
    /// User's roles
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// Profile id carried in the subject
    ///
    /// Accepts both a bare UUID and the `USR-` display form.
    pub fn profile_id(&self) -> Result<ProfileId, AuthError> {
        ProfileId::from_str(&self.sub).map_err(|_| AuthError::InvalidSubject(self.sub.clone()))
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token subject is not a profile id: {0}")]
    InvalidSubject(String),
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `profile_id` - Profile the token is issued for
/// * `roles` - User's roles
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    profile_id: ProfileId,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: profile_id.as_uuid().to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
///
/// With `audience` set, the token's `aud` must name it. Without one the
/// `aud` claim is not checked, so backend tokens carrying
/// `aud: "authenticated"` are still accepted.
pub fn validate_token(token: &str, secret: &str, audience: Option<&str>) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// The authenticated user's profile
///
/// Requires `auth_middleware` to have run. A valid token without a matching
/// profile is refused with 403.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Profile);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or(ApiError::Unauthorized)?;
        let id = claims.profile_id().map_err(|_| ApiError::Unauthorized)?;

        match state.profiles.current(id).await {
            Ok(profile) => Ok(CurrentUser(profile)),
            Err(CaseError::ProfileNotFound(_)) => Err(ApiError::Forbidden(
                "No profile exists for the authenticated user".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
