//! Streaming archive export handler.
//!
//! `GET /media/download/zip` is the one endpoint with real streaming
//! concerns. The record set is resolved (and the empty case rejected)
//! before any response byte is produced; committing the 200 and its headers
//! is the point of no return, after which every failure degrades to "stop
//! writing and close the stream" and is surfaced only through logs.

use super::{ExportQuery, parse_kind_filter};
use crate::api::AppState;
use crate::api::auth::AdminSession;
use crate::error::ApiError;
use crate::export;
use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// GET /media/download/zip - Export matching media as a ZIP stream (Admin only)
#[utoipa::path(
    get,
    path = "/media/download/zip",
    tag = "export",
    params(
        ("type" = Option<String>, Query, description = "Restrict to one kind: image or video")
    ),
    responses(
        (status = 200, description = "ZIP archive stream", content_type = "application/zip"),
        (status = 400, description = "Invalid type filter", body = crate::error::ApiError),
        (status = 404, description = "No media found", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid session token", body = crate::error::ApiError)
    ),
    security(("admin_token" = []))
)]
pub async fn download_archive(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let kind = match parse_kind_filter(query.kind.as_deref()) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };

    // Resolve the record set before committing anything to the wire; an
    // empty set is the last point where the run can fail cleanly
    let records = match state.gallery.export_records(kind).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve export records");
            return e.into_response();
        }
    };

    if records.is_empty() {
        return (StatusCode::NOT_FOUND, Json(ApiError::new("No media found"))).into_response();
    }

    let filename = export::archive_filename(&state.config.export.archive_prefix, chrono::Utc::now());
    let compression_level = state.config.export.compression_level;

    tracing::info!(
        records = records.len(),
        kind = ?kind,
        filename = %filename,
        "starting archive export"
    );

    // Bounded pipe between the export task and the response body. A slow
    // client fills the pipe and pauses the encoder (and with it the remote
    // reads); a disconnected client surfaces as a broken-pipe sink error
    // that aborts the run without finalize.
    let (read_half, write_half) = tokio::io::duplex(state.config.export.stream_buffer_bytes);

    let gallery = state.gallery.clone();
    tokio::spawn(async move {
        // The outcome summary and any fatal error are logged inside the
        // orchestrator; the response is already in flight, so nothing can
        // be reported to the client from here
        let _ = export::export_archive(
            &gallery.fetcher,
            &records,
            write_half,
            compression_level,
        )
        .await;
    });

    let body = Body::from_stream(ReaderStream::new(read_half));

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(body)
    {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build export response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal("Failed to start export")),
            )
                .into_response()
        }
    }
}
