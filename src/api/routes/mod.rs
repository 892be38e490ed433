//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`media`] — Media listing and management
//! - [`export`] — Streaming archive export
//! - [`auth`] — Admin session login/logout
//! - [`system`] — Health and OpenAPI

use crate::error::{Error, Result};
use crate::types::MediaKind;
use serde::{Deserialize, Serialize};

mod auth;
mod export;
mod media;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use auth::*;
pub use export::*;
pub use media::*;
pub use system::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Query parameters for GET /media
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ListMediaQuery {
    /// Filter by media kind: "image" or "video"
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Caption substring to search for
    pub search: Option<String>,
    /// Page number, 1-based (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 20, max: 100)
    pub limit: Option<i64>,
}

/// Query parameters for GET /media/download/zip
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ExportQuery {
    /// Restrict the export to one media kind: "image" or "video"
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Request body for POST /media/upload
///
/// The objects themselves were already uploaded to the storage provider;
/// this registers the resulting records.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UploadMediaRequest {
    /// Stored objects to register
    pub items: Vec<crate::types::NewMediaRecord>,
}

/// Request body for PATCH /media/:id/caption
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateCaptionRequest {
    /// New caption (stored trimmed; empty clears the caption)
    pub caption: String,
}

/// Request body for POST /auth/login
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Admin password
    pub password: String,
}

/// Parse and validate an optional `type` query parameter
///
/// The parameter is restricted to "image" and "video"; anything else is a
/// validation error rather than a silently ignored filter.
pub(crate) fn parse_kind_filter(raw: Option<&str>) -> Result<Option<MediaKind>> {
    match raw {
        None => Ok(None),
        Some(value) => MediaKind::parse(value).map(Some).ok_or_else(|| {
            Error::Validation("Invalid type filter. Must be 'image' or 'video'".to_string())
        }),
    }
}
