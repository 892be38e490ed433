use super::*;

#[tokio::test]
async fn fresh_database_migrates_and_accepts_inserts() {
    let (db, _dir) = create_test_db().await;

    let id = db.insert_media(&sample_media("first", MediaKind::Image)).await.unwrap();
    assert_eq!(id.get(), 1);
}

#[tokio::test]
async fn reopening_is_idempotent_and_keeps_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");

    let db = Database::new(&path).await.unwrap();
    let id = db.insert_media(&sample_media("kept", MediaKind::Video)).await.unwrap();
    db.close().await;

    // Second open must not re-run migration v1 against existing tables
    let db = Database::new(&path).await.unwrap();
    let record = db.get_media(id).await.unwrap().unwrap();
    assert_eq!(record.storage_key, "gallery/kept");

    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(version, 1);
}

#[tokio::test]
async fn creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/test.db");

    let db = Database::new(&path).await.unwrap();
    db.insert_media(&sample_media("a", MediaKind::Image)).await.unwrap();
}

#[tokio::test]
async fn kind_check_constraint_rejects_unknown_values() {
    let (db, _dir) = create_test_db().await;

    let result = sqlx::query(
        "INSERT INTO media (url, storage_key, kind, caption, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind("https://cdn.example.com/x")
    .bind("gallery/x")
    .bind("audio")
    .bind("")
    .bind(0i64)
    .execute(&db.pool)
    .await;

    assert!(result.is_err(), "CHECK constraint should reject kind='audio'");
}
