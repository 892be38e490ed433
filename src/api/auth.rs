//! Admin authentication for the REST API
//!
//! Admin routes take an [`AdminSession`] extractor argument, which checks
//! the `Authorization: Bearer <token>` header against the gallery's
//! session token store. When no admin password is configured,
//! authentication is disabled and every request passes through.

use crate::api::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

/// Proof that a request passed the admin gate
///
/// The `token` is the bearer token that authorized the request; it is
/// `None` when authentication is disabled (no admin password configured).
pub struct AdminSession {
    /// The session token presented by the client, if any
    pub token: Option<String>,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // With no password configured there are no sessions to check
        if state.config.api.admin_password.is_none() {
            return Ok(Self { token: None });
        }

        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let Some(token) = bearer else {
            return Err(unauthorized_response(
                "Authentication required. Please provide a valid token.",
            ));
        };

        // Some clients send the token with surrounding quotes
        let token = token.trim_matches('"');

        if state.gallery.tokens.verify(token).await {
            Ok(Self {
                token: Some(token.to_string()),
            })
        } else {
            Err(unauthorized_response(
                "Invalid or expired token. Please login again.",
            ))
        }
    }
}

/// Constant-time byte comparison to prevent timing side-channel attacks.
/// Always compares all bytes regardless of where the first mismatch occurs.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Helper function to create a 401 Unauthorized response with a JSON error body
fn unauthorized_response(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ApiError::unauthorized(message))).into_response()
}
