//! Review-side persistence
//!
//! Reviews, likes and tag votes are written by the application layer; the
//! catalog core only reads them. The write helpers here exist for that layer
//! and for seeding test databases.

use crate::error::StoreError;
use crate::types::{LocalId, ReviewId, ReviewRow, TagVote, UserId, VoteKind};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

/// Review to be written
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: UserId,
    pub rating: f64,
    pub content: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub is_published: bool,
}

pub async fn save_profile(
    pool: &SqlitePool,
    user_id: UserId,
    username: &str,
    is_admin: bool,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, username, is_admin) VALUES (?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            username = excluded.username,
            is_admin = excluded.is_admin
        "#,
    )
    .bind(user_id.to_string())
    .bind(username)
    .bind(is_admin)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert_review(
    pool: &SqlitePool,
    game_id: LocalId,
    review: &NewReview,
) -> Result<ReviewId, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO reviews (game_id, user_id, rating, content, pros, cons, is_published, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(game_id)
    .bind(review.user_id.to_string())
    .bind(review.rating)
    .bind(&review.content)
    .bind(serde_json::to_string(&review.pros)?)
    .bind(serde_json::to_string(&review.cons)?)
    .bind(review.is_published)
    .bind(Utc::now().timestamp_millis())
    .execute(pool)
    .await
    .map_err(StoreError::from_write)?;

    Ok(result.last_insert_rowid())
}

/// Like a review; liking twice is a no-op
pub async fn like_review(
    pool: &SqlitePool,
    review_id: ReviewId,
    user_id: UserId,
) -> Result<(), StoreError> {
    sqlx::query("INSERT OR IGNORE INTO review_likes (review_id, user_id, created_at) VALUES (?, ?, ?)")
        .bind(review_id)
        .bind(user_id.to_string())
        .bind(Utc::now().timestamp_millis())
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn add_tag_vote(
    pool: &SqlitePool,
    review_id: ReviewId,
    kind: VoteKind,
    value: &str,
) -> Result<(), StoreError> {
    sqlx::query("INSERT OR IGNORE INTO review_tag_votes (review_id, kind, value) VALUES (?, ?, ?)")
        .bind(review_id)
        .bind(kind.as_str())
        .bind(value)
        .execute(pool)
        .await?;

    Ok(())
}

fn parse_user_id(raw: &str) -> Result<UserId, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::Corrupt(format!("user id '{}': {}", raw, e)))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Published reviews for a game with the reviewer's admin flag
pub async fn load_published_reviews(
    pool: &SqlitePool,
    game_id: LocalId,
) -> Result<Vec<ReviewRow>, StoreError> {
    let rows = sqlx::query(
        r#"
        SELECT r.id, r.user_id, r.rating, r.content, r.pros, r.cons,
               COALESCE(p.is_admin, 0) AS is_admin
        FROM reviews r
        LEFT JOIN profiles p ON p.user_id = r.user_id
        WHERE r.game_id = ? AND r.is_published = 1
        ORDER BY r.id
        "#,
    )
    .bind(game_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<ReviewRow, StoreError> {
            let user_id: String = row.try_get("user_id")?;
            let pros: String = row.try_get("pros")?;
            let cons: String = row.try_get("cons")?;

            Ok(ReviewRow {
                id: row.try_get("id")?,
                user_id: parse_user_id(&user_id)?,
                rating: row.try_get("rating")?,
                content: row.try_get("content")?,
                pros: serde_json::from_str(&pros)?,
                cons: serde_json::from_str(&cons)?,
                reviewer_is_admin: row.try_get("is_admin")?,
            })
        })
        .collect()
}

pub async fn load_like_counts(
    pool: &SqlitePool,
    review_ids: &[ReviewId],
) -> Result<HashMap<ReviewId, u32>, StoreError> {
    if review_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        "SELECT review_id, COUNT(*) AS likes FROM review_likes WHERE review_id IN ({}) GROUP BY review_id",
        placeholders(review_ids.len())
    );
    let mut query = sqlx::query(&sql);
    for id in review_ids {
        query = query.bind(*id);
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<(ReviewId, u32), StoreError> {
            let review_id: ReviewId = row.try_get("review_id")?;
            let likes: i64 = row.try_get("likes")?;
            Ok((review_id, likes as u32))
        })
        .collect()
}

/// Published review counts per reviewer across all games
pub async fn load_published_review_counts(
    pool: &SqlitePool,
    user_ids: &[UserId],
) -> Result<HashMap<UserId, u32>, StoreError> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        "SELECT user_id, COUNT(*) AS reviews FROM reviews WHERE is_published = 1 AND user_id IN ({}) GROUP BY user_id",
        placeholders(user_ids.len())
    );
    let mut query = sqlx::query(&sql);
    for id in user_ids {
        query = query.bind(id.to_string());
    }

    let rows = query.fetch_all(pool).await?;
    rows.iter()
        .map(|row| -> Result<(UserId, u32), StoreError> {
            let user_id: String = row.try_get("user_id")?;
            let reviews: i64 = row.try_get("reviews")?;
            Ok((parse_user_id(&user_id)?, reviews as u32))
        })
        .collect()
}

/// Vote tallies of one kind across a game's published reviews
pub async fn load_review_votes(
    pool: &SqlitePool,
    game_id: LocalId,
    kind: VoteKind,
) -> Result<Vec<TagVote>, StoreError> {
    let rows = sqlx::query(
        r#"
        SELECT v.value, COUNT(*) AS votes
        FROM review_tag_votes v
        JOIN reviews r ON r.id = v.review_id
        WHERE r.game_id = ? AND r.is_published = 1 AND v.kind = ?
        GROUP BY v.value
        ORDER BY v.value
        "#,
    )
    .bind(game_id)
    .bind(kind.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<TagVote, StoreError> {
            let votes: i64 = row.try_get("votes")?;
            Ok(TagVote {
                value: row.try_get("value")?,
                votes: votes as u32,
            })
        })
        .collect()
}

pub async fn count_published_reviews(pool: &SqlitePool, game_id: LocalId) -> Result<u32, StoreError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE game_id = ? AND is_published = 1")
            .bind(game_id)
            .fetch_one(pool)
            .await?;
    Ok(count as u32)
}
