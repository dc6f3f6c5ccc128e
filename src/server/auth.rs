//! Caller identity extractors.
//!
//! In `token` mode the identity comes from a signed `Authorization: Bearer`
//! token; in `headers` mode from the `x-user-id`, `x-user-name` and
//! `x-user-email` headers, all three required.

use crate::config::AuthMode;
use crate::core::session;
use crate::errors::AppError;
use crate::models::user::Identity;
use crate::server::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Rejects the request with 401 unless the caller is identified.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Identity);

/// Identifies the caller when possible, never rejects.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Identity>);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn from_token(parts: &Parts, secret: &str) -> Option<Identity> {
    let value = header(parts, AUTHORIZATION.as_str())?;
    let token = value.strip_prefix("Bearer ")?.trim();

    match session::verify(token, secret) {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::debug!(error = %e, "rejected session token");
            None
        }
    }
}

fn from_headers(parts: &Parts) -> Option<Identity> {
    let id = header(parts, USER_ID_HEADER)?.parse().ok()?;
    let name = header(parts, USER_NAME_HEADER)?;
    let email = header(parts, USER_EMAIL_HEADER)?;

    Some(Identity {
        id,
        name: name.to_string(),
        email: email.to_string(),
    })
}

pub fn identify(parts: &Parts, state: &AppState) -> Option<Identity> {
    match state.config.auth.mode {
        AuthMode::Token => from_token(parts, &state.config.auth.secret),
        AuthMode::Headers => from_headers(parts),
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        identify(parts, state)
            .map(RequireAuth)
            .ok_or(AppError::AuthRequired)
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(identify(parts, state)))
    }
}
