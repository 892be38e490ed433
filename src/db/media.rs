//! Media record CRUD operations and export listing.

use crate::error::{DatabaseError, Error, Result};
use crate::types::{MediaId, MediaKind, MediaRecord, NewMediaRecord};

use super::{Database, MediaRow};

const MEDIA_COLUMNS: &str = "id, url, storage_key, kind, caption, created_at";

impl Database {
    /// Insert a new media record
    pub async fn insert_media(&self, media: &NewMediaRecord) -> Result<MediaId> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO media (url, storage_key, kind, caption, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&media.url)
        .bind(&media.storage_key)
        .bind(media.kind.as_str())
        .bind(media.caption.trim())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert media: {}",
                e
            )))
        })?;

        Ok(MediaId(result.last_insert_rowid()))
    }

    /// Get a media record by ID
    pub async fn get_media(&self, id: MediaId) -> Result<Option<MediaRecord>> {
        let row = sqlx::query_as::<_, MediaRow>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get media: {}",
                e
            )))
        })?;

        row.map(MediaRow::into_record).transpose()
    }

    /// List media records, most recent first
    ///
    /// `kind` and `search` (caption substring) are optional filters;
    /// `limit`/`offset` paginate the result.
    pub async fn list_media(
        &self,
        kind: Option<MediaKind>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MediaRecord>> {
        let mut sql = format!("SELECT {MEDIA_COLUMNS} FROM media");
        push_filters(&mut sql, kind, search);
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, MediaRow>(&sql);
        if let Some(kind) = kind {
            query = query.bind(kind.as_str());
        }
        if let Some(search) = search {
            query = query.bind(format!("%{}%", search));
        }
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to list media: {}",
                    e
                )))
            })?;

        rows.into_iter().map(MediaRow::into_record).collect()
    }

    /// Count media records matching the given filters
    pub async fn count_media(&self, kind: Option<MediaKind>, search: Option<&str>) -> Result<i64> {
        let mut sql = "SELECT COUNT(*) FROM media".to_string();
        push_filters(&mut sql, kind, search);

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(kind) = kind {
            query = query.bind(kind.as_str());
        }
        if let Some(search) = search {
            query = query.bind(format!("%{}%", search));
        }

        query.fetch_one(&self.pool).await.map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to count media: {}",
                e
            )))
        })
    }

    /// Update a record's caption, returning the updated record
    ///
    /// Returns `Ok(None)` when no record has the given ID.
    pub async fn update_caption(&self, id: MediaId, caption: &str) -> Result<Option<MediaRecord>> {
        let result = sqlx::query("UPDATE media SET caption = ? WHERE id = ?")
            .bind(caption.trim())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to update caption: {}",
                    e
                )))
            })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_media(id).await
    }

    /// Delete a media record, returning whether it existed
    pub async fn delete_media(&self, id: MediaId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to delete media: {}",
                    e
                )))
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// List every record for an export run, most recent first
    ///
    /// The ordering is stable across calls within a run (`created_at` with an
    /// `id` tiebreak) and listing has no side effects.
    pub async fn list_export_records(&self, kind: Option<MediaKind>) -> Result<Vec<MediaRecord>> {
        let mut sql = format!("SELECT {MEDIA_COLUMNS} FROM media");
        push_filters(&mut sql, kind, None);
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query_as::<_, MediaRow>(&sql);
        if let Some(kind) = kind {
            query = query.bind(kind.as_str());
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to list export records: {}",
                e
            )))
        })?;

        rows.into_iter().map(MediaRow::into_record).collect()
    }
}

/// Append WHERE clauses for the optional kind and caption-search filters
///
/// Bind order must match: kind first, then search.
fn push_filters(sql: &mut String, kind: Option<MediaKind>, search: Option<&str>) {
    let mut clauses: Vec<&str> = Vec::new();
    if kind.is_some() {
        clauses.push("kind = ?");
    }
    if search.is_some() {
        clauses.push("caption LIKE ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
}
