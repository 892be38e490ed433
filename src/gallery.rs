//! Core gallery service
//!
//! [`MediaGallery`] owns the database, the remote object fetcher, and the
//! session token store. It is cheap to clone (all fields are Arc-backed
//! handles) and is shared across API request tasks.

use crate::auth::TokenStore;
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::export;
use crate::fetch::RemoteFetcher;
use crate::types::{ExportOutcome, MediaKind, MediaRecord};
use std::sync::Arc;
use tokio::io::AsyncWrite;

/// Main gallery service instance (cloneable - all fields are handles)
#[derive(Clone)]
pub struct MediaGallery {
    /// Database instance for persistence (wrapped in Arc for sharing across tasks)
    /// Public for integration tests to query media records
    pub db: Arc<Database>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Admin session token registry
    pub(crate) tokens: TokenStore,
    /// HTTP client for the remote object store
    pub(crate) fetcher: RemoteFetcher,
}

impl MediaGallery {
    /// Create a new MediaGallery instance
    ///
    /// Validates the configuration, opens/creates the SQLite database, runs
    /// migrations, and builds the remote-store HTTP client.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Database::new(&config.persistence.database_path).await?;
        let fetcher = RemoteFetcher::new(&config.remote)?;

        tracing::info!(
            database = %config.persistence.database_path.display(),
            "media gallery initialized"
        );

        Ok(Self {
            db: Arc::new(db),
            config: Arc::new(config),
            tokens: TokenStore::new(),
            fetcher,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the record set for an export run
    ///
    /// Records come back most-recent-first with a stable ordering across
    /// calls within a run; listing has no side effects.
    pub async fn export_records(&self, kind: Option<MediaKind>) -> Result<Vec<MediaRecord>> {
        self.db.list_export_records(kind).await
    }

    /// Export all matching media into `sink` as a streaming ZIP archive
    ///
    /// Library-level entry point for embedders exporting somewhere other
    /// than an HTTP response (a file, a socket). The HTTP route drives the
    /// same pipeline but resolves records first so the empty case can still
    /// be reported as a clean error before any bytes are written.
    pub async fn export_to_sink<S: AsyncWrite + Unpin>(
        &self,
        kind: Option<MediaKind>,
        sink: S,
    ) -> Result<ExportOutcome> {
        let records = self.export_records(kind).await?;
        export::export_archive(
            &self.fetcher,
            &records,
            sink,
            self.config.export.compression_level,
        )
        .await
    }

    /// Spawn the REST API server as a background task
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let gallery = self.clone();
        let config = self.config.clone();
        tokio::spawn(async move { crate::api::start_api_server(gallery, config).await })
    }

    /// Shut the gallery down: revoke all sessions and close the database
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down media gallery");
        self.tokens.clear().await;
        self.db.close().await;
        Ok(())
    }
}
