//! Signed session tokens: HS256 JWTs keyed with `auth.secret`, carrying the
//! caller identity and an expiry.

use crate::errors::{AppError, AppResult};
use crate::models::user::Identity;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    name: String,
    email: String,
    exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Issue a token for `identity` valid for `ttl_hours` from `now`.
pub fn issue_at(
    identity: &Identity,
    secret: &str,
    ttl_hours: i64,
    now: DateTime<Utc>,
) -> AppResult<String> {
    let claims = Claims {
        sub: identity.id,
        name: identity.name.clone(),
        email: identity.email.clone(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Other(format!("failed to sign session token: {e}")))
}

pub fn issue(identity: &Identity, secret: &str, ttl_hours: i64) -> AppResult<String> {
    issue_at(identity, secret, ttl_hours, Utc::now())
}

/// Check signature and expiry and return the identity the token was
/// issued for.
pub fn verify(token: &str, secret: &str) -> Result<Identity, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(Identity {
        id: data.claims.sub,
        name: data.claims.name,
        email: data.claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity {
            id: 7,
            name: "Alice".into(),
            email: "alice@example.com".into(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let token = issue(&alice(), "s3cret", 1).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(verify(&token, "s3cret").unwrap(), alice());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(&alice(), "s3cret", 1).unwrap();
        assert_eq!(verify(&token, "other"), Err(TokenError::BadSignature));
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let token = issue(&alice(), "s3cret", 1).unwrap();
        let mallory = Identity {
            id: 1,
            name: "Mallory".into(),
            email: "m@example.com".into(),
        };
        let other = issue(&mallory, "s3cret", 1).unwrap();

        // alice's header and signature around mallory's claims
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = other.split('.').nth(1).unwrap();
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);
        assert_eq!(verify(&forged, "s3cret"), Err(TokenError::BadSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::hours(3);
        let token = issue_at(&alice(), "s3cret", 1, issued).unwrap();
        assert_eq!(verify(&token, "s3cret"), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(verify("not-a-token", "s3cret"), Err(TokenError::Malformed));
        assert_eq!(verify("a.b!c", "s3cret"), Err(TokenError::Malformed));
    }
}
