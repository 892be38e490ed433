use super::*;
use crate::types::NewMediaRecord;
use tempfile::TempDir;

mod migrations;

/// Helper to create a Database backed by a scratch file
pub(crate) async fn create_test_db() -> (Database, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = Database::new(&dir.path().join("test.db")).await.unwrap();
    (db, dir)
}

/// Helper to build a media record for insertion
pub(crate) fn sample_media(storage_key: &str, kind: MediaKind) -> NewMediaRecord {
    NewMediaRecord {
        url: format!("https://cdn.example.com/{}.bin", storage_key),
        storage_key: format!("gallery/{}", storage_key),
        kind,
        caption: String::new(),
    }
}

/// Insert a record with an explicit created_at, bypassing insert_media's
/// "now" timestamp, for ordering tests
pub(crate) async fn insert_with_timestamp(
    db: &Database,
    media: &NewMediaRecord,
    created_at: i64,
) -> MediaId {
    let result = sqlx::query(
        "INSERT INTO media (url, storage_key, kind, caption, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&media.url)
    .bind(&media.storage_key)
    .bind(media.kind.as_str())
    .bind(&media.caption)
    .bind(created_at)
    .execute(&db.pool)
    .await
    .unwrap();

    MediaId(result.last_insert_rowid())
}
