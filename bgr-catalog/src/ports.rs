//! Collaborator interfaces
//!
//! The catalog core never talks to the network or a specific database
//! directly. Registration, scoring and statistics are written against these
//! traits; `db::SqliteGameStore` and the types in `memory` implement them.

use crate::error::StoreError;
use crate::types::{
    CatalogGame, CatalogId, GameRecord, LocalId, RatingSource, ReviewId, ReviewRow, TagVote,
    UserId, VoteKind,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Source catalog lookup
///
/// `Ok(None)` means the catalog has no such game. Transport failures are
/// reported as errors; the registrar folds both into `SourceUnavailable`.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn fetch_game(&self, catalog_id: CatalogId) -> anyhow::Result<Option<CatalogGame>>;
}

/// Free-text translation into the site language
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> anyhow::Result<String>;
}

/// Allocator for manual game ids
///
/// Implementations must never hand out the same id twice, including under
/// concurrent callers.
#[async_trait]
pub trait IdAllocator: Send + Sync {
    async fn next_local_id(&self) -> Result<LocalId, StoreError>;
}

/// Game and review persistence
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn find_by_id(&self, id: LocalId) -> Result<Option<GameRecord>, StoreError>;

    async fn find_by_catalog_id(
        &self,
        catalog_id: CatalogId,
    ) -> Result<Option<GameRecord>, StoreError>;

    /// Manual records only; imported games never match
    async fn find_manual_by_localized_name(
        &self,
        localized_name: &str,
    ) -> Result<Option<GameRecord>, StoreError>;

    /// Insert a new record
    ///
    /// Fails with `StoreError::UniqueViolation` when the id, catalog id or
    /// manual localized name is already taken.
    async fn insert_game(&self, record: &GameRecord) -> Result<(), StoreError>;

    /// Overwrite an existing record
    async fn update_game(&self, record: &GameRecord) -> Result<(), StoreError>;

    /// Overwrite only the rating aggregate
    async fn update_rating(
        &self,
        id: LocalId,
        average: f64,
        count: u32,
        source: RatingSource,
    ) -> Result<(), StoreError>;

    /// Largest id at or above `floor`, if any
    async fn max_id_from(&self, floor: LocalId) -> Result<Option<LocalId>, StoreError>;

    async fn published_reviews(&self, game_id: LocalId) -> Result<Vec<ReviewRow>, StoreError>;

    /// Like counts for the given reviews; reviews without likes may be absent
    async fn like_counts(
        &self,
        review_ids: &[ReviewId],
    ) -> Result<HashMap<ReviewId, u32>, StoreError>;

    /// Published review counts per reviewer, across all games
    async fn published_review_counts(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, u32>, StoreError>;

    /// Votes per tag value across a game's published reviews
    async fn review_votes(
        &self,
        game_id: LocalId,
        kind: VoteKind,
    ) -> Result<Vec<TagVote>, StoreError>;

    async fn published_review_total(&self, game_id: LocalId) -> Result<u32, StoreError>;
}
