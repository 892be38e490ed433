//! Media listing and management handlers.

use super::{ListMediaQuery, UpdateCaptionRequest, UploadMediaRequest, parse_kind_filter};
use crate::api::AppState;
use crate::api::auth::AdminSession;
use crate::error::Error;
use crate::types::{MediaId, NewMediaRecord};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /media - List media with filters and pagination
#[utoipa::path(
    get,
    path = "/media",
    tag = "media",
    params(
        ("type" = Option<String>, Query, description = "Filter by kind: image or video"),
        ("search" = Option<String>, Query, description = "Caption substring to search for"),
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)")
    ),
    responses(
        (status = 200, description = "Paginated media listing"),
        (status = 400, description = "Invalid type filter", body = crate::error::ApiError),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_media(
    State(state): State<AppState>,
    Query(query): Query<ListMediaQuery>,
) -> Response {
    let kind = match parse_kind_filter(query.kind.as_deref()) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };

    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;
    let search = query.search.as_deref();

    let media = match state.gallery.db.list_media(kind, search, limit, offset).await {
        Ok(media) => media,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list media");
            return e.into_response();
        }
    };

    let total = match state.gallery.db.count_media(kind, search).await {
        Ok(total) => total,
        Err(e) => {
            tracing::error!(error = %e, "Failed to count media");
            return e.into_response();
        }
    };

    let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "count": media.len(),
            "total": total,
            "page": page,
            "totalPages": total_pages,
            "hasNextPage": page < total_pages,
            "hasPrevPage": page > 1,
            "media": media,
        })),
    )
        .into_response()
}

/// GET /media/:id - Get a single media record
#[utoipa::path(
    get,
    path = "/media/{id}",
    tag = "media",
    params(
        ("id" = i64, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Media record", body = crate::types::MediaRecord),
        (status = 404, description = "Media not found", body = crate::error::ApiError),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_media(State(state): State<AppState>, Path(id): Path<MediaId>) -> Response {
    match state.gallery.db.get_media(id).await {
        Ok(Some(media)) => (
            StatusCode::OK,
            Json(json!({"success": true, "media": media})),
        )
            .into_response(),
        Ok(None) => Error::NotFound("Media".to_string()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, id = %id, "Failed to get media");
            e.into_response()
        }
    }
}

/// POST /media/upload - Register stored media objects (Admin only)
///
/// The upload to the object store itself happens out of band; this records
/// the resulting URLs and storage keys, one record per item, continuing past
/// per-item validation failures like the original multi-file upload.
#[utoipa::path(
    post,
    path = "/media/upload",
    tag = "media",
    request_body = UploadMediaRequest,
    responses(
        (status = 201, description = "Registration summary with per-item failures"),
        (status = 400, description = "No items provided", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid session token", body = crate::error::ApiError)
    ),
    security(("admin_token" = []))
)]
pub async fn upload_media(
    _session: AdminSession,
    State(state): State<AppState>,
    Json(request): Json<UploadMediaRequest>,
) -> Response {
    if request.items.is_empty() {
        return Error::Validation("No media items provided".to_string()).into_response();
    }

    let mut registered = Vec::new();
    let mut errors = Vec::new();

    for item in &request.items {
        if let Err(reason) = validate_new_media(item) {
            errors.push(json!({"storage_key": item.storage_key, "error": reason}));
            continue;
        }

        match state.gallery.db.insert_media(item).await {
            Ok(id) => match state.gallery.db.get_media(id).await {
                Ok(Some(record)) => registered.push(record),
                Ok(None) => {
                    errors.push(json!({"storage_key": item.storage_key, "error": "record vanished after insert"}));
                }
                Err(e) => {
                    errors.push(json!({"storage_key": item.storage_key, "error": e.to_string()}));
                }
            },
            Err(e) => {
                tracing::error!(error = %e, storage_key = %item.storage_key, "Failed to register media");
                errors.push(json!({"storage_key": item.storage_key, "error": e.to_string()}));
            }
        }
    }

    let mut body = json!({
        "success": true,
        "message": format!("Successfully registered {} media item(s)", registered.len()),
        "registered": registered.len(),
        "failed": errors.len(),
        "media": registered,
    });
    if !errors.is_empty() {
        body["errors"] = json!(errors);
    }

    (StatusCode::CREATED, Json(body)).into_response()
}

/// PATCH /media/:id/caption - Update a caption (Admin only)
#[utoipa::path(
    patch,
    path = "/media/{id}/caption",
    tag = "media",
    params(
        ("id" = i64, Path, description = "Media ID")
    ),
    request_body = UpdateCaptionRequest,
    responses(
        (status = 200, description = "Updated media record"),
        (status = 404, description = "Media not found", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid session token", body = crate::error::ApiError)
    ),
    security(("admin_token" = []))
)]
pub async fn update_caption(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<MediaId>,
    Json(request): Json<UpdateCaptionRequest>,
) -> Response {
    match state.gallery.db.update_caption(id, &request.caption).await {
        Ok(Some(media)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Caption updated successfully",
                "media": media,
            })),
        )
            .into_response(),
        Ok(None) => Error::NotFound("Media".to_string()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, id = %id, "Failed to update caption");
            e.into_response()
        }
    }
}

/// DELETE /media/:id - Delete a media record (Admin only)
///
/// Removes the database record; deleting the backing object is the storage
/// provider's concern.
#[utoipa::path(
    delete,
    path = "/media/{id}",
    tag = "media",
    params(
        ("id" = i64, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Media deleted"),
        (status = 404, description = "Media not found", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid session token", body = crate::error::ApiError)
    ),
    security(("admin_token" = []))
)]
pub async fn delete_media(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<MediaId>,
) -> Response {
    match state.gallery.db.delete_media(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({"success": true, "message": "Media deleted successfully"})),
        )
            .into_response(),
        Ok(false) => Error::NotFound("Media".to_string()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, id = %id, "Failed to delete media");
            e.into_response()
        }
    }
}

/// Validate one record registration before insertion
fn validate_new_media(item: &NewMediaRecord) -> Result<(), String> {
    if item.storage_key.trim().is_empty() {
        return Err("storage key must not be empty".to_string());
    }

    match url::Url::parse(&item.url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        Ok(parsed) => Err(format!("unsupported URL scheme '{}'", parsed.scheme())),
        Err(e) => Err(format!("invalid URL: {}", e)),
    }
}
