//! Error types for media-gallery
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Database, Export)
//! - HTTP status code mapping for API integration
//! - The `{success: false, message}` JSON error body used by every endpoint

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for media-gallery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-gallery
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "compression_level")
        key: Option<String>,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Archive export pipeline error
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Request validation error (bad query parameter or body)
    #[error("{0}")]
    Validation(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Missing or invalid session token, or wrong admin password
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),
}

/// Errors raised by the archive export pipeline
///
/// Per-member failures (`RemoteStatus`, `Transport`, `MemberRead`,
/// `Encoding`, `MemberTooLarge`) are recovered by skipping the member and
/// recording it in the run outcome. Sink and finalize failures are fatal to
/// the run: once the response body is in flight there is nothing left to do
/// but stop writing and close the stream.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The record's URL is not an absolute HTTP/HTTPS URL
    #[error("invalid remote URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The remote object store answered with a non-2xx status
    #[error("remote returned status {status} for {url}")]
    RemoteStatus {
        /// The URL that was fetched
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// Connection, DNS, or timeout failure before or during the fetch
    #[error("transport error fetching {url}: {reason}")]
    Transport {
        /// The URL that was fetched
        url: String,
        /// The underlying transport failure
        reason: String,
    },

    /// The member's source stream failed mid-read; the member was abandoned
    #[error("read error while streaming member {name}: {reason}")]
    MemberRead {
        /// The archive member name being written when the stream failed
        name: String,
        /// The underlying read failure
        reason: String,
    },

    /// The compressor rejected the member's data
    #[error("encoding error for member {name}: {reason}")]
    Encoding {
        /// The archive member name being encoded
        name: String,
        /// The underlying compressor failure
        reason: String,
    },

    /// Member exceeds the 4 GiB ZIP size fields (ZIP64 is not supported)
    #[error("member {name} exceeds the 4 GiB archive entry limit")]
    MemberTooLarge {
        /// The archive member name that overflowed
        name: String,
    },

    /// Writing to the output sink failed (typically a disconnected client)
    #[error("sink write failed: {0}")]
    Sink(#[source] std::io::Error),

    /// Writing the archive trailer failed; the archive is incomplete
    #[error("finalize failed: {0}")]
    Finalize(#[source] std::io::Error),
}

impl ExportError {
    /// Whether this error terminates the export run.
    ///
    /// Per-member failures are skipped and recorded; only sink and finalize
    /// failures abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExportError::Sink(_) | ExportError::Finalize(_))
    }
}

/// API error response body
///
/// Every error endpoint responds with this shape:
///
/// ```json
/// {
///   "success": false,
///   "message": "Media not found"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Always `false` for error responses
    pub success: bool,

    /// Human-readable error message, suitable for displaying to end users
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(format!("{} not found", resource.into()))
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - invalid input
            Error::Validation(_) => 400,

            // 401 Unauthorized
            Error::Unauthorized(_) => 401,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 502 Bad Gateway - the remote object store failed
            Error::Export(ExportError::RemoteStatus { .. })
            | Error::Export(ExportError::Transport { .. }) => 502,

            // 500 Internal Server Error - everything else
            Error::Config { .. }
            | Error::Database(_)
            | Error::Export(_)
            | Error::Io(_)
            | Error::ApiServerError(_)
            | Error::Other(_) => 500,
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError::new(error.to_string())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a vec of (Error, expected_status_code) covering every
    /// reachable match arm in ToHttpStatus.
    fn all_error_variants() -> Vec<(Error, u16)> {
        vec![
            (
                Error::Config {
                    message: "bad value".into(),
                    key: Some("compression_level".into()),
                },
                500,
            ),
            (
                Error::Database(DatabaseError::QueryFailed("timeout".into())),
                500,
            ),
            (Error::Validation("type must be image or video".into()), 400),
            (Error::NotFound("Media".into()), 404),
            (Error::Unauthorized("invalid token".into()), 401),
            (
                Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
                500,
            ),
            (Error::ApiServerError("bind failed".into()), 500),
            (Error::Other("unknown".into()), 500),
            (
                Error::Export(ExportError::RemoteStatus {
                    url: "https://cdn.example.com/a.jpg".into(),
                    status: 404,
                }),
                502,
            ),
            (
                Error::Export(ExportError::Transport {
                    url: "https://cdn.example.com/a.jpg".into(),
                    reason: "connection refused".into(),
                }),
                502,
            ),
            (
                Error::Export(ExportError::Encoding {
                    name: "a.jpg".into(),
                    reason: "deflate failed".into(),
                }),
                500,
            ),
            (
                Error::Export(ExportError::Sink(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "client gone",
                ))),
                500,
            ),
        ]
    }

    #[test]
    fn status_codes_for_all_variants() {
        for (error, expected_status) in all_error_variants() {
            assert_eq!(
                error.status_code(),
                expected_status,
                "wrong status for {error:?}"
            );
        }
    }

    #[test]
    fn api_error_wire_shape() {
        let error = Error::NotFound("Media".to_string());
        let api_error: ApiError = error.into();
        let json = serde_json::to_value(&api_error).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Media not found");
    }

    #[test]
    fn api_error_constructors() {
        assert_eq!(ApiError::not_found("Media").message, "Media not found");
        assert!(!ApiError::validation("bad input").success);
        assert!(!ApiError::unauthorized("no token").success);
    }

    #[test]
    fn fatal_classification() {
        let sink = ExportError::Sink(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "client gone",
        ));
        let finalize = ExportError::Finalize(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            "short write",
        ));
        assert!(sink.is_fatal());
        assert!(finalize.is_fatal());

        let status = ExportError::RemoteStatus {
            url: "https://cdn.example.com/a.jpg".into(),
            status: 404,
        };
        let member = ExportError::MemberRead {
            name: "a.jpg".into(),
            reason: "reset by peer".into(),
        };
        assert!(!status.is_fatal());
        assert!(!member.is_fatal());
    }

    #[test]
    fn export_error_display_carries_context() {
        let err = ExportError::RemoteStatus {
            url: "https://cdn.example.com/missing.mp4".into(),
            status: 404,
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("missing.mp4"));
    }
}
