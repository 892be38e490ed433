//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the media-gallery REST
//! API using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the media-gallery REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (if enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "media-gallery REST API",
        version = "0.1.0",
        description = "REST API for a media gallery backend with streaming ZIP export",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8700", description = "Local development server")
    ),
    paths(
        // Media
        crate::api::routes::list_media,
        crate::api::routes::get_media,
        crate::api::routes::upload_media,
        crate::api::routes::update_caption,
        crate::api::routes::delete_media,

        // Export
        crate::api::routes::download_archive,

        // Auth
        crate::api::routes::login,
        crate::api::routes::logout,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::MediaKind,
        crate::types::MediaRecord,
        crate::types::NewMediaRecord,
        crate::types::FailedItem,
        crate::types::ExportOutcome,

        // API request/response types from routes/mod.rs
        crate::api::routes::ListMediaQuery,
        crate::api::routes::ExportQuery,
        crate::api::routes::UploadMediaRequest,
        crate::api::routes::UpdateCaptionRequest,
        crate::api::routes::LoginRequest,

        // Error types from error.rs
        crate::error::ApiError,
    )),
    tags(
        (name = "media", description = "Media records - List, register, caption, and delete stored media"),
        (name = "export", description = "Archive export - Stream all matching media as a single ZIP download"),
        (name = "auth", description = "Admin sessions - Obtain and revoke session tokens"),
        (name = "system", description = "System endpoints - Health check, OpenAPI spec"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security addon to add the bearer-token scheme to the OpenAPI spec
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "admin_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}
