use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::main_lib::AppState;

/// Expected admin identity, held as SHA-256 digests.
///
/// Digest equality keeps the comparison length-independent of the
/// presented values and avoids retaining the configured password in
/// memory as plaintext.
#[derive(Clone)]
pub struct AdminCredentials {
    username_digest: [u8; 32],
    password_digest: [u8; 32],
}

impl AdminCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username_digest: digest(username),
            password_digest: digest(password),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        digest(username) == self.username_digest && digest(password) == self.password_digest
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// Basic-auth gate for admin routes.
///
/// Missing or unparseable credentials are a 401; parseable credentials
/// that do not match the configured admin pair are a 403.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing auth".to_string()))?;

    let (username, password) =
        parse_basic(header).ok_or_else(|| ApiError::Unauthorized("Invalid auth".to_string()))?;

    if !state.admin.matches(&username, &password) {
        tracing::debug!("[Auth] Rejected admin credentials");
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    Ok(next.run(request).await)
}

/// Splits a `Basic <base64(user:pass)>` header into its parts.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (username, password) = text.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
