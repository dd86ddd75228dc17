//! Game row persistence
//!
//! Tag and player-count sets are JSON arrays in TEXT columns. Timestamps are
//! Unix milliseconds.

use crate::error::StoreError;
use crate::types::{CatalogId, GameRecord, LocalId, RatingSource};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

const SELECT_GAME: &str = r#"
    SELECT id, catalog_id, name, localized_name, description, year_published,
           min_players, max_players, playing_time, min_playing_time, max_playing_time,
           min_age, image_url, thumbnail_url, designers, display_publisher,
           source_categories, source_mechanics, source_publishers,
           site_categories, site_mechanics, site_publishers, player_count_categories,
           best_player_counts, recommended_player_counts,
           rating_average, rating_count, rating_source, created_at, updated_at
    FROM games
"#;

const INSERT_GAME: &str = r#"
    INSERT INTO games (
        id, catalog_id, name, localized_name, description, year_published,
        min_players, max_players, playing_time, min_playing_time, max_playing_time,
        min_age, image_url, thumbnail_url, designers, display_publisher,
        source_categories, source_mechanics, source_publishers,
        site_categories, site_mechanics, site_publishers, player_count_categories,
        best_player_counts, recommended_player_counts,
        rating_average, rating_count, rating_source, created_at, updated_at
    ) VALUES (
        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
        ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30
    )
"#;

const UPDATE_GAME: &str = r#"
    UPDATE games SET
        catalog_id = ?2, name = ?3, localized_name = ?4, description = ?5,
        year_published = ?6, min_players = ?7, max_players = ?8, playing_time = ?9,
        min_playing_time = ?10, max_playing_time = ?11, min_age = ?12,
        image_url = ?13, thumbnail_url = ?14, designers = ?15, display_publisher = ?16,
        source_categories = ?17, source_mechanics = ?18, source_publishers = ?19,
        site_categories = ?20, site_mechanics = ?21, site_publishers = ?22,
        player_count_categories = ?23, best_player_counts = ?24,
        recommended_player_counts = ?25, rating_average = ?26, rating_count = ?27,
        rating_source = ?28, created_at = ?29, updated_at = ?30
    WHERE id = ?1
"#;

/// Column values for one `games` row
struct GameColumns {
    id: i64,
    catalog_id: Option<i64>,
    name: String,
    localized_name: Option<String>,
    description: Option<String>,
    year_published: Option<i32>,
    min_players: Option<i64>,
    max_players: Option<i64>,
    playing_time: Option<i64>,
    min_playing_time: Option<i64>,
    max_playing_time: Option<i64>,
    min_age: Option<i64>,
    image_url: Option<String>,
    thumbnail_url: Option<String>,
    designers: String,
    display_publisher: Option<String>,
    source_categories: String,
    source_mechanics: String,
    source_publishers: String,
    site_categories: String,
    site_mechanics: String,
    site_publishers: String,
    player_count_categories: String,
    best_player_counts: String,
    recommended_player_counts: String,
    rating_average: Option<f64>,
    rating_count: i64,
    rating_source: &'static str,
    created_at: i64,
    updated_at: i64,
}

impl GameColumns {
    fn encode(record: &GameRecord) -> Result<Self, StoreError> {
        Ok(Self {
            id: record.id,
            catalog_id: record.catalog_id,
            name: record.name.clone(),
            localized_name: record.localized_name.clone(),
            description: record.description.clone(),
            year_published: record.year_published,
            min_players: record.min_players.map(i64::from),
            max_players: record.max_players.map(i64::from),
            playing_time: record.playing_time.map(i64::from),
            min_playing_time: record.min_playing_time.map(i64::from),
            max_playing_time: record.max_playing_time.map(i64::from),
            min_age: record.min_age.map(i64::from),
            image_url: record.image_url.clone(),
            thumbnail_url: record.thumbnail_url.clone(),
            designers: serde_json::to_string(&record.designers)?,
            display_publisher: record.display_publisher.clone(),
            source_categories: serde_json::to_string(&record.source_categories)?,
            source_mechanics: serde_json::to_string(&record.source_mechanics)?,
            source_publishers: serde_json::to_string(&record.source_publishers)?,
            site_categories: serde_json::to_string(&record.site_categories)?,
            site_mechanics: serde_json::to_string(&record.site_mechanics)?,
            site_publishers: serde_json::to_string(&record.site_publishers)?,
            player_count_categories: serde_json::to_string(&record.player_count_categories)?,
            best_player_counts: serde_json::to_string(&record.best_player_counts)?,
            recommended_player_counts: serde_json::to_string(&record.recommended_player_counts)?,
            rating_average: record.rating_average,
            rating_count: i64::from(record.rating_count),
            rating_source: record.rating_source.as_str(),
            created_at: record.created_at.timestamp_millis(),
            updated_at: record.updated_at.timestamp_millis(),
        })
    }

    /// Bind in ?1..?30 order
    fn bind<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.id)
            .bind(self.catalog_id)
            .bind(&self.name)
            .bind(&self.localized_name)
            .bind(&self.description)
            .bind(self.year_published)
            .bind(self.min_players)
            .bind(self.max_players)
            .bind(self.playing_time)
            .bind(self.min_playing_time)
            .bind(self.max_playing_time)
            .bind(self.min_age)
            .bind(&self.image_url)
            .bind(&self.thumbnail_url)
            .bind(&self.designers)
            .bind(&self.display_publisher)
            .bind(&self.source_categories)
            .bind(&self.source_mechanics)
            .bind(&self.source_publishers)
            .bind(&self.site_categories)
            .bind(&self.site_mechanics)
            .bind(&self.site_publishers)
            .bind(&self.player_count_categories)
            .bind(&self.best_player_counts)
            .bind(&self.recommended_player_counts)
            .bind(self.rating_average)
            .bind(self.rating_count)
            .bind(self.rating_source)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

fn json_column<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, StoreError> {
    let raw: String = row.try_get(column)?;
    Ok(serde_json::from_str(&raw)?)
}

fn count_column(row: &SqliteRow, column: &str) -> Result<Option<u32>, StoreError> {
    let raw: Option<i64> = row.try_get(column)?;
    raw.map(|value| {
        u32::try_from(value)
            .map_err(|_| StoreError::Corrupt(format!("{} out of range: {}", column, value)))
    })
    .transpose()
}

fn timestamp_column(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, StoreError> {
    let millis: i64 = row.try_get(column)?;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::Corrupt(format!("{} out of range: {}", column, millis)))
}

fn decode_game(row: &SqliteRow) -> Result<GameRecord, StoreError> {
    let rating_source: String = row.try_get("rating_source")?;
    let rating_source = RatingSource::parse(&rating_source)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown rating source '{}'", rating_source)))?;

    Ok(GameRecord {
        id: row.try_get("id")?,
        catalog_id: row.try_get("catalog_id")?,
        name: row.try_get("name")?,
        localized_name: row.try_get("localized_name")?,
        description: row.try_get("description")?,
        year_published: row.try_get("year_published")?,
        min_players: count_column(row, "min_players")?,
        max_players: count_column(row, "max_players")?,
        playing_time: count_column(row, "playing_time")?,
        min_playing_time: count_column(row, "min_playing_time")?,
        max_playing_time: count_column(row, "max_playing_time")?,
        min_age: count_column(row, "min_age")?,
        image_url: row.try_get("image_url")?,
        thumbnail_url: row.try_get("thumbnail_url")?,
        designers: json_column(row, "designers")?,
        display_publisher: row.try_get("display_publisher")?,
        source_categories: json_column(row, "source_categories")?,
        source_mechanics: json_column(row, "source_mechanics")?,
        source_publishers: json_column(row, "source_publishers")?,
        site_categories: json_column(row, "site_categories")?,
        site_mechanics: json_column(row, "site_mechanics")?,
        site_publishers: json_column(row, "site_publishers")?,
        player_count_categories: json_column(row, "player_count_categories")?,
        best_player_counts: json_column(row, "best_player_counts")?,
        recommended_player_counts: json_column(row, "recommended_player_counts")?,
        rating_average: row.try_get("rating_average")?,
        rating_count: count_column(row, "rating_count")?.unwrap_or(0),
        rating_source,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

fn decode_optional(row: Option<SqliteRow>) -> Result<Option<GameRecord>, StoreError> {
    row.as_ref().map(decode_game).transpose()
}

/// Insert a new game; uniqueness violations are reported as such
pub async fn insert_game(pool: &SqlitePool, record: &GameRecord) -> Result<(), StoreError> {
    let columns = GameColumns::encode(record)?;
    columns
        .bind(sqlx::query(INSERT_GAME))
        .execute(pool)
        .await
        .map_err(StoreError::from_write)?;
    Ok(())
}

/// Overwrite every column of an existing game
pub async fn update_game(pool: &SqlitePool, record: &GameRecord) -> Result<(), StoreError> {
    let columns = GameColumns::encode(record)?;
    let result = columns
        .bind(sqlx::query(UPDATE_GAME))
        .execute(pool)
        .await
        .map_err(StoreError::from_write)?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(record.id));
    }
    Ok(())
}

pub async fn update_rating(
    pool: &SqlitePool,
    id: LocalId,
    average: f64,
    count: u32,
    source: RatingSource,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE games
        SET rating_average = ?, rating_count = ?, rating_source = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(average)
    .bind(i64::from(count))
    .bind(source.as_str())
    .bind(Utc::now().timestamp_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}

pub async fn load_game(pool: &SqlitePool, id: LocalId) -> Result<Option<GameRecord>, StoreError> {
    let sql = format!("{} WHERE id = ?", SELECT_GAME);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    decode_optional(row)
}

pub async fn load_game_by_catalog_id(
    pool: &SqlitePool,
    catalog_id: CatalogId,
) -> Result<Option<GameRecord>, StoreError> {
    let sql = format!("{} WHERE catalog_id = ?", SELECT_GAME);
    let row = sqlx::query(&sql).bind(catalog_id).fetch_optional(pool).await?;
    decode_optional(row)
}

/// Manual games only
pub async fn load_manual_game_by_localized_name(
    pool: &SqlitePool,
    localized_name: &str,
) -> Result<Option<GameRecord>, StoreError> {
    let sql = format!(
        "{} WHERE catalog_id IS NULL AND localized_name = ?",
        SELECT_GAME
    );
    let row = sqlx::query(&sql)
        .bind(localized_name)
        .fetch_optional(pool)
        .await?;
    decode_optional(row)
}

/// Largest game id at or above `floor`
pub async fn max_id_from(pool: &SqlitePool, floor: LocalId) -> Result<Option<LocalId>, StoreError> {
    let max: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM games WHERE id >= ?")
        .bind(floor)
        .fetch_one(pool)
        .await?;
    Ok(max)
}

/// Take the next id from a named sequence in one statement
pub async fn next_sequence_id(pool: &SqlitePool, sequence: &str) -> Result<LocalId, StoreError> {
    let allocated: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE id_sequences
        SET next_id = next_id + 1
        WHERE name = ?
        RETURNING next_id - 1
        "#,
    )
    .bind(sequence)
    .fetch_optional(pool)
    .await?;

    allocated.ok_or_else(|| StoreError::Corrupt(format!("id sequence '{}' missing", sequence)))
}
