//! SQLite-backed persistence
//!
//! Schema creation lives in `bgr_common::db`; this module holds the queries
//! and the `GameStore`/`IdAllocator` implementation over a shared pool.

pub mod games;
pub mod reviews;

pub use reviews::NewReview;

use crate::error::StoreError;
use crate::ports::{GameStore, IdAllocator};
use crate::types::{
    CatalogId, GameRecord, LocalId, RatingSource, ReviewId, ReviewRow, TagVote, UserId, VoteKind,
};
use async_trait::async_trait;
use bgr_common::db::MANUAL_ID_SEQUENCE;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Game store over a SQLite pool
///
/// Also allocates manual ids from the `id_sequences` table, so several
/// processes sharing one database never hand out the same id.
#[derive(Debug, Clone)]
pub struct SqliteGameStore {
    pool: SqlitePool,
}

impl SqliteGameStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl GameStore for SqliteGameStore {
    async fn find_by_id(&self, id: LocalId) -> Result<Option<GameRecord>, StoreError> {
        games::load_game(&self.pool, id).await
    }

    async fn find_by_catalog_id(
        &self,
        catalog_id: CatalogId,
    ) -> Result<Option<GameRecord>, StoreError> {
        games::load_game_by_catalog_id(&self.pool, catalog_id).await
    }

    async fn find_manual_by_localized_name(
        &self,
        localized_name: &str,
    ) -> Result<Option<GameRecord>, StoreError> {
        games::load_manual_game_by_localized_name(&self.pool, localized_name).await
    }

    async fn insert_game(&self, record: &GameRecord) -> Result<(), StoreError> {
        games::insert_game(&self.pool, record).await
    }

    async fn update_game(&self, record: &GameRecord) -> Result<(), StoreError> {
        games::update_game(&self.pool, record).await
    }

    async fn update_rating(
        &self,
        id: LocalId,
        average: f64,
        count: u32,
        source: RatingSource,
    ) -> Result<(), StoreError> {
        games::update_rating(&self.pool, id, average, count, source).await
    }

    async fn max_id_from(&self, floor: LocalId) -> Result<Option<LocalId>, StoreError> {
        games::max_id_from(&self.pool, floor).await
    }

    async fn published_reviews(&self, game_id: LocalId) -> Result<Vec<ReviewRow>, StoreError> {
        reviews::load_published_reviews(&self.pool, game_id).await
    }

    async fn like_counts(
        &self,
        review_ids: &[ReviewId],
    ) -> Result<HashMap<ReviewId, u32>, StoreError> {
        reviews::load_like_counts(&self.pool, review_ids).await
    }

    async fn published_review_counts(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, u32>, StoreError> {
        reviews::load_published_review_counts(&self.pool, user_ids).await
    }

    async fn review_votes(
        &self,
        game_id: LocalId,
        kind: VoteKind,
    ) -> Result<Vec<TagVote>, StoreError> {
        reviews::load_review_votes(&self.pool, game_id, kind).await
    }

    async fn published_review_total(&self, game_id: LocalId) -> Result<u32, StoreError> {
        reviews::count_published_reviews(&self.pool, game_id).await
    }
}

#[async_trait]
impl IdAllocator for SqliteGameStore {
    async fn next_local_id(&self) -> Result<LocalId, StoreError> {
        games::next_sequence_id(&self.pool, MANUAL_ID_SEQUENCE).await
    }
}
