//! Shared fixtures for the bgr-catalog integration tests

#![allow(dead_code)]

use bgr_catalog::db::{reviews, NewReview};
use bgr_catalog::types::{CatalogGame, CatalogVersion, LocalId, ReviewId};
use bgr_catalog::SqliteGameStore;
use bgr_common::db::init_database;
use tempfile::TempDir;
use uuid::Uuid;

pub const MANUAL_ID_START: i64 = 10_000_000;

/// Fresh on-disk database; keep the `TempDir` alive for the test's duration
pub async fn sqlite_store() -> (TempDir, SqliteGameStore) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("bgr.db"), MANUAL_ID_START)
        .await
        .unwrap();
    (dir, SqliteGameStore::new(pool))
}

pub fn love_letter() -> CatalogGame {
    CatalogGame {
        catalog_id: 129622,
        name: "Love Letter".to_string(),
        description: Some("Deliver your letter to the princess.".to_string()),
        year_published: Some(2012),
        min_players: Some(2),
        max_players: Some(4),
        playing_time: Some(20),
        min_age: Some(10),
        designers: vec!["Seiji Kanai".to_string()],
        publishers: vec![
            "Alderac Entertainment Group".to_string(),
            "Arclight".to_string(),
        ],
        categories: vec!["Card Game".to_string(), "Deduction".to_string()],
        mechanics: vec!["Hand Management".to_string(), "Player Elimination".to_string()],
        average_rating: Some(7.2),
        rating_count: 100_000,
        best_player_counts: vec![4],
        recommended_player_counts: vec![2, 3, 4],
        versions: vec![CatalogVersion {
            name: "ラブレター".to_string(),
            publishers: vec!["Arclight".to_string()],
            year_published: Some(2013),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Register a reviewer profile and return its id
pub async fn reviewer(store: &SqliteGameStore, name: &str, is_admin: bool) -> Uuid {
    let user_id = Uuid::new_v4();
    reviews::save_profile(store.pool(), user_id, name, is_admin)
        .await
        .unwrap();
    user_id
}

pub async fn review(
    store: &SqliteGameStore,
    game_id: LocalId,
    user_id: Uuid,
    rating: f64,
    is_published: bool,
) -> ReviewId {
    reviews::insert_review(
        store.pool(),
        game_id,
        &NewReview {
            user_id,
            rating,
            content: "Quick and tense.".to_string(),
            pros: Vec::new(),
            cons: Vec::new(),
            is_published,
        },
    )
    .await
    .unwrap()
}
