//! HTTP basic-auth extractor guarding statistics writes.

use armory_core::error::CoreError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::Credentials;
use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the configured statistics credentials.
///
/// ```ignore
/// async fn my_handler(_writer: StatisticsWriter) -> AppResult<Json<()>> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct StatisticsWriter {
    pub user: String,
}

impl FromRequestParts<AppState> for StatisticsWriter {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let (user, password) = decode_basic(auth_header)
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Basic <credentials>"))?;

        if !matches_credentials(&state.config.statistics_credentials, &user, &password) {
            tracing::warn!(user = %user, "Rejected statistics credentials");
            return Err(unauthorized("Invalid credentials"));
        }

        Ok(StatisticsWriter { user })
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// Decode a `Basic <base64(user:password)>` header value.
pub fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

fn matches_credentials(expected: &Credentials, user: &str, password: &str) -> bool {
    // Compare every byte regardless of where the first mismatch is.
    fn eq(a: &[u8], b: &[u8]) -> bool {
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
    let user_ok = eq(expected.user.as_bytes(), user.as_bytes());
    let password_ok = eq(expected.password.as_bytes(), password.as_bytes());
    user_ok & password_ok
}
