//! Expiry inspection for the streaming platform's session JWT.
//!
//! The streaming platform authenticates with a browser session token that
//! cannot be refreshed programmatically. The daemon checks its `exp` claim so
//! the operator gets a warning before automation silently stops working.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::auth::AuthError;

/// How close to expiry the token may get before a warning is logged.
const EXPIRY_WARNING_WINDOW_HOURS: i64 = 72;

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    exp: i64,
}

/// Decodes the token's payload and returns the `exp` claim as a timestamp.
pub fn session_token_expiry(jwt: &SecretString) -> Result<DateTime<Utc>, AuthError> {
    let raw = jwt.expose_secret();
    let payload = raw
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::InvalidToken("token is not in JWT form".to_string()))?;

    let bytes = base64::Engine::decode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, payload)
        .map_err(|e| AuthError::InvalidToken(format!("payload is not base64: {}", e)))?;

    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::InvalidToken(format!("claims are not JSON: {}", e)))?;

    DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AuthError::InvalidToken(format!("exp claim out of range: {}", claims.exp)))
}

/// Errors when the token has expired; warns when expiry is inside the
/// 72-hour window so the operator can re-provision in time.
pub fn check_session_token(jwt: &SecretString, now: DateTime<Utc>) -> Result<(), AuthError> {
    let expiry = session_token_expiry(jwt)?;

    if expiry <= now {
        return Err(AuthError::TokenExpired { expired_at: expiry });
    }

    if expiry <= now + Duration::hours(EXPIRY_WARNING_WINDOW_HOURS) {
        log::warn!(
            "Streaming session token expires at {}; re-provision the token store soon",
            expiry
        );
    }

    Ok(())
}
