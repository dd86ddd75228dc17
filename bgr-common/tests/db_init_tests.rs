//! Tests for database initialization
//!
//! Covers first-run creation, reopening an existing database, and the
//! uniqueness constraints the catalog core relies on.

use bgr_common::db::{init_database, MANUAL_ID_SEQUENCE};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("bgr.db");

    let result = init_database(&db_path, 10_000_000).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("bgr.db");

    let pool1 = init_database(&db_path, 10_000_000).await;
    assert!(pool1.is_ok());
    drop(pool1);

    let pool2 = init_database(&db_path, 10_000_000).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_expected_tables_exist() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("bgr.db"), 10_000_000)
        .await
        .unwrap();

    for table in [
        "schema_version",
        "games",
        "profiles",
        "reviews",
        "review_likes",
        "review_tag_votes",
        "id_sequences",
    ] {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1, "table {} missing", table);
    }
}

#[tokio::test]
async fn test_manual_sequence_seeded_once() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("bgr.db");

    let pool = init_database(&db_path, 10_000_000).await.unwrap();
    sqlx::query("UPDATE id_sequences SET next_id = next_id + 5 WHERE name = ?")
        .bind(MANUAL_ID_SEQUENCE)
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    // Reopening with a different start must not reset the sequence
    let pool = init_database(&db_path, 42).await.unwrap();
    let next: i64 = sqlx::query_scalar("SELECT next_id FROM id_sequences WHERE name = ?")
        .bind(MANUAL_ID_SEQUENCE)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(next, 10_000_005);
}

#[tokio::test]
async fn test_catalog_id_is_unique() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("bgr.db"), 10_000_000)
        .await
        .unwrap();

    let insert = "INSERT INTO games (id, catalog_id, name, created_at, updated_at) VALUES (?, ?, ?, 0, 0)";
    sqlx::query(insert)
        .bind(1_i64)
        .bind(174430_i64)
        .bind("Gloomhaven")
        .execute(&pool)
        .await
        .unwrap();

    let duplicate = sqlx::query(insert)
        .bind(2_i64)
        .bind(174430_i64)
        .bind("Gloomhaven again")
        .execute(&pool)
        .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_manual_localized_name_is_unique() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("bgr.db"), 10_000_000)
        .await
        .unwrap();

    let insert = "INSERT INTO games (id, catalog_id, name, localized_name, created_at, updated_at) VALUES (?, ?, ?, ?, 0, 0)";

    // Imported games may share a localized name with each other
    for (id, catalog_id) in [(1_i64, 1_i64), (2, 2)] {
        sqlx::query(insert)
            .bind(id)
            .bind(catalog_id)
            .bind("Coup")
            .bind("クー")
            .execute(&pool)
            .await
            .unwrap();
    }

    sqlx::query(insert)
        .bind(10_000_000_i64)
        .bind(None::<i64>)
        .bind("Coup")
        .bind("クー")
        .execute(&pool)
        .await
        .unwrap();

    let duplicate = sqlx::query(insert)
        .bind(10_000_001_i64)
        .bind(None::<i64>)
        .bind("Coup (manual)")
        .bind("クー")
        .execute(&pool)
        .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_unusable_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let result = init_database(&blocker.join("bgr.db"), 10_000_000).await;
    assert!(
        matches!(result, Err(bgr_common::Error::Io(_))),
        "expected IO error, got {:?}",
        result.as_ref().err()
    );
}
