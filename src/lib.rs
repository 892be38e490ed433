//! # media-gallery
//!
//! Backend library for a media gallery with a streaming ZIP export
//! pipeline.
//!
//! ## Design Philosophy
//!
//! media-gallery is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Streaming** - Archive exports begin before all objects are fetched,
//!   with memory bounded by one in-flight chunk regardless of export size
//! - **Failure-tolerant** - One unreachable object never aborts an export
//! - **Sensible defaults** - Works out of the box with zero configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_gallery::{Config, MediaGallery};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let gallery = Arc::new(MediaGallery::new(config).await?);
//!
//!     // Serve the REST API in the background
//!     let api = gallery.spawn_api_server();
//!
//!     // ... or export straight to any AsyncWrite sink
//!     let mut file = tokio::fs::File::create("export.zip").await?;
//!     let outcome = gallery.export_to_sink(None, &mut file).await?;
//!     println!("archived {} of {} items", outcome.succeeded, outcome.attempted);
//!
//!     api.abort();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Streaming ZIP archive encoder
pub mod archive;
/// Session token store
pub mod auth;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Archive export orchestration
pub mod export;
/// Remote object fetching
pub mod fetch;
/// Core gallery service
pub mod gallery;
/// Core types
pub mod types;

// Re-export commonly used types
pub use archive::ArchiveWriter;
pub use auth::TokenStore;
pub use config::{ApiConfig, Config, ExportConfig, PersistenceConfig, RemoteConfig};
pub use db::Database;
pub use error::{ApiError, DatabaseError, Error, ExportError, Result, ToHttpStatus};
pub use fetch::RemoteFetcher;
pub use gallery::MediaGallery;
pub use types::{ExportOutcome, FailedItem, MediaId, MediaKind, MediaRecord, NewMediaRecord};

/// Helper function to run the gallery with graceful signal handling.
///
/// Waits for a termination signal and then calls the gallery's `shutdown()`
/// method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use media_gallery::{Config, MediaGallery, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gallery = Arc::new(MediaGallery::new(Config::default()).await?);
///     let api = gallery.spawn_api_server();
///
///     // Run until SIGTERM/SIGINT
///     run_with_shutdown(&gallery).await?;
///     api.abort();
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(gallery: &MediaGallery) -> Result<()> {
    wait_for_signal().await;
    gallery.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
