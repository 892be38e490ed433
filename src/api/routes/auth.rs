//! Admin session handlers.

use super::LoginRequest;
use crate::api::AppState;
use crate::api::auth::{AdminSession, constant_time_eq};
use crate::error::{ApiError, Error};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// POST /auth/login - Obtain an admin session token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; body carries the session token"),
        (status = 400, description = "Password missing", body = crate::error::ApiError),
        (status = 401, description = "Invalid password", body = crate::error::ApiError),
        (status = 500, description = "Admin password not configured", body = crate::error::ApiError)
    )
)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Response {
    if request.password.is_empty() {
        return Error::Validation("Password is required".to_string()).into_response();
    }

    let Some(expected) = state.config.api.admin_password.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("Admin password not configured")),
        )
            .into_response();
    };

    if !constant_time_eq(request.password.as_bytes(), expected.as_bytes()) {
        tracing::warn!("admin login rejected: wrong password");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiError::unauthorized("Invalid password")),
        )
            .into_response();
    }

    let token = state.gallery.tokens.issue().await;
    tracing::info!("admin login succeeded");

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Login successful",
            "token": token,
        })),
    )
        .into_response()
}

/// POST /auth/logout - Revoke the current session token (Admin only)
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session revoked"),
        (status = 401, description = "Missing or invalid session token", body = crate::error::ApiError)
    ),
    security(("admin_token" = []))
)]
pub async fn logout(session: AdminSession, State(state): State<AppState>) -> Response {
    if let Some(token) = session.token {
        state.gallery.tokens.remove(&token).await;
    }

    (
        StatusCode::OK,
        Json(json!({"success": true, "message": "Logout successful"})),
    )
        .into_response()
}
