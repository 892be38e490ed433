//! Database layer for media-gallery
//!
//! Handles SQLite persistence for media records.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — Database lifecycle, schema migrations
//! - [`media`] — Media record CRUD and export listing

use crate::error::{DatabaseError, Result};
use crate::types::{MediaId, MediaKind, MediaRecord};
use sqlx::{FromRow, sqlite::SqlitePool};

mod media;
mod migrations;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

/// Media record as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct MediaRow {
    /// Unique database ID
    pub id: i64,
    /// Remote URL of the backing object
    pub url: String,
    /// Storage provider key
    pub storage_key: String,
    /// Media kind ("image" or "video", enforced by a CHECK constraint)
    pub kind: String,
    /// User-supplied caption
    pub caption: String,
    /// Unix timestamp when the record was created
    pub created_at: i64,
}

impl MediaRow {
    /// Convert a database row into the public record type
    fn into_record(self) -> Result<MediaRecord> {
        let kind = MediaKind::parse(&self.kind).ok_or_else(|| {
            DatabaseError::QueryFailed(format!("invalid media kind '{}' in row {}", self.kind, self.id))
        })?;

        Ok(MediaRecord {
            id: MediaId(self.id),
            url: self.url,
            storage_key: self.storage_key,
            kind,
            caption: self.caption,
            created_at: chrono::DateTime::from_timestamp(self.created_at, 0)
                .unwrap_or_else(chrono::Utc::now),
        })
    }
}

/// SQLite-backed persistence for the gallery
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
