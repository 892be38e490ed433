//! REST API server module
//!
//! Provides the gallery's REST API: public media browsing, admin media
//! management, and the streaming ZIP export endpoint.

use crate::{Config, MediaGallery, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Media (public)
/// - `GET /media` - List media with filters and pagination
/// - `GET /media/:id` - Get a single media record
///
/// ## Media (admin)
/// - `POST /media/upload` - Register stored media objects
/// - `PATCH /media/:id/caption` - Update a caption
/// - `DELETE /media/:id` - Delete a media record
/// - `GET /media/download/zip` - Export matching media as a ZIP stream
///
/// ## Auth
/// - `POST /auth/login` - Obtain an admin session token
/// - `POST /auth/logout` - Revoke the current session token (admin)
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
///
/// Admin routes require `Authorization: Bearer <token>` once an admin
/// password is configured; with no password configured the gate is
/// disabled.
pub fn create_router(gallery: Arc<MediaGallery>, config: Arc<Config>) -> Router {
    let state = AppState::new(gallery, config.clone());

    // Build the router with all routes
    let router = Router::new()
        // Media browsing
        .route("/media", get(routes::list_media))
        .route("/media/:id", get(routes::get_media))
        // Media management (admin-gated via the AdminSession extractor)
        .route("/media/upload", post(routes::upload_media))
        .route("/media/:id", delete(routes::delete_media))
        .route("/media/:id/caption", patch(routes::update_caption))
        // Archive export
        .route("/media/download/zip", get(routes::download_archive))
        // Admin sessions
        .route("/auth/login", post(routes::login))
        .route("/auth/logout", post(routes::logout))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // Merge Swagger UI routes if enabled in config (before applying state).
    // The UI loads its spec from a dedicated path so the hand-routed
    // /openapi.json endpoint stays untouched.
    let router = if config.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    // Add state to all routes
    let router = router.with_state(state);

    // Apply CORS middleware if enabled in config
    if config.api.cors_enabled {
        let cors = build_cors_layer(&config.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// Allows the specified origins (supports "*" for any origin), all methods,
/// and all headers for cross-origin requests.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    // Check if "*" (all origins) is in the list
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        // Allow all origins (default for local development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow specific origins
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Creates a TCP listener, binds it to the configured address, and serves
/// the API router until the server is shut down.
///
/// # Example
///
/// ```no_run
/// use media_gallery::{Config, MediaGallery};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let gallery = Arc::new(MediaGallery::new((*config).clone()).await?);
///
/// // Start API server (blocks until shutdown)
/// media_gallery::api::start_api_server(gallery, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(gallery: Arc<MediaGallery>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.api.bind_address;

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    // Create the router with all routes
    let app = create_router(gallery, config);

    // Bind TCP listener to the configured address
    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
