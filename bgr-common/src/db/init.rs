//! Database initialization
//!
//! Opens (or creates) the SQLite database and creates every table the catalog
//! core reads and writes. All statements are idempotent, so opening an
//! existing database is safe.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Name of the `id_sequences` row used for manually authored games
pub const MANUAL_ID_SEQUENCE: &str = "manual_games";

/// Initialize database connection and create tables if needed
///
/// `manual_id_start` seeds the manual game id sequence the first time the
/// database is created; an existing sequence is left untouched.
pub async fn init_database(db_path: &Path, manual_id_start: i64) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL lets readers proceed while a registration writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool, manual_id_start).await?;

    Ok(pool)
}

/// Create all tables, indexes and the manual id sequence
pub async fn create_schema(pool: &SqlitePool, manual_id_start: i64) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_games_table(pool).await?;
    create_profiles_table(pool).await?;
    create_reviews_table(pool).await?;
    create_review_likes_table(pool).await?;
    create_review_tag_votes_table(pool).await?;
    create_id_sequences_table(pool, manual_id_start).await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Games table
///
/// Tag sets and player-count sets are JSON arrays in TEXT columns.
async fn create_games_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS games (
            id INTEGER PRIMARY KEY,
            catalog_id INTEGER UNIQUE,
            name TEXT NOT NULL,
            localized_name TEXT,
            description TEXT,
            year_published INTEGER,
            min_players INTEGER,
            max_players INTEGER,
            playing_time INTEGER,
            min_playing_time INTEGER,
            max_playing_time INTEGER,
            min_age INTEGER,
            image_url TEXT,
            thumbnail_url TEXT,
            designers TEXT NOT NULL DEFAULT '[]',
            display_publisher TEXT,
            source_categories TEXT NOT NULL DEFAULT '[]',
            source_mechanics TEXT NOT NULL DEFAULT '[]',
            source_publishers TEXT NOT NULL DEFAULT '[]',
            site_categories TEXT NOT NULL DEFAULT '[]',
            site_mechanics TEXT NOT NULL DEFAULT '[]',
            site_publishers TEXT NOT NULL DEFAULT '[]',
            player_count_categories TEXT NOT NULL DEFAULT '[]',
            best_player_counts TEXT NOT NULL DEFAULT '[]',
            recommended_player_counts TEXT NOT NULL DEFAULT '[]',
            rating_average REAL,
            rating_count INTEGER NOT NULL DEFAULT 0,
            rating_source TEXT NOT NULL DEFAULT 'unrated',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Manual records are unique by localized name; imported ones by catalog id
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_games_manual_localized_name
        ON games(localized_name)
        WHERE catalog_id IS NULL
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_profiles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            user_id TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_reviews_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES profiles(user_id),
            rating REAL NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            pros TEXT NOT NULL DEFAULT '[]',
            cons TEXT NOT NULL DEFAULT '[]',
            is_published INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_game ON reviews(game_id, is_published)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(user_id, is_published)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_review_likes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS review_likes (
            review_id INTEGER NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (review_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Reviewer-selected tags and player counts
///
/// `kind` is one of `mechanic`, `category`, `player_count`.
async fn create_review_tag_votes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS review_tag_votes (
            review_id INTEGER NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
            kind TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (review_id, kind, value)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_id_sequences_table(pool: &SqlitePool, manual_id_start: i64) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS id_sequences (
            name TEXT PRIMARY KEY,
            next_id INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO id_sequences (name, next_id) VALUES (?, ?)")
        .bind(MANUAL_ID_SEQUENCE)
        .bind(manual_id_start)
        .execute(pool)
        .await?;

    Ok(())
}
