//! In-memory collaborators
//!
//! `InMemoryGameStore` enforces the same uniqueness rules as the SQLite
//! schema. `StaticCatalog` and `StaticTranslator` stand in for the network
//! collaborators in tests and local tooling.

use crate::error::StoreError;
use crate::ports::{CatalogLookup, GameStore, Translator};
use crate::types::{
    CatalogGame, CatalogId, GameRecord, LocalId, RatingSource, ReviewId, ReviewRow, TagVote,
    UserId, VoteKind,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

// ============================================================================
// Game store
// ============================================================================

#[derive(Debug, Clone)]
struct StoredReview {
    game_id: LocalId,
    review: ReviewRow,
    is_published: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    games: BTreeMap<LocalId, GameRecord>,
    reviews: BTreeMap<ReviewId, StoredReview>,
    likes: HashMap<ReviewId, HashSet<UserId>>,
    votes: HashSet<(ReviewId, VoteKind, String)>,
    next_review_id: ReviewId,
}

impl MemoryState {
    fn published_for(&self, game_id: LocalId) -> impl Iterator<Item = &StoredReview> {
        self.reviews
            .values()
            .filter(move |r| r.game_id == game_id && r.is_published)
    }

    fn check_unique(&self, record: &GameRecord) -> Result<(), StoreError> {
        if self.games.contains_key(&record.id) {
            return Err(StoreError::UniqueViolation {
                constraint: "games.id".to_string(),
            });
        }

        for existing in self.games.values() {
            if record.catalog_id.is_some() && existing.catalog_id == record.catalog_id {
                return Err(StoreError::UniqueViolation {
                    constraint: "games.catalog_id".to_string(),
                });
            }
            if record.catalog_id.is_none()
                && existing.catalog_id.is_none()
                && record.localized_name.is_some()
                && existing.localized_name == record.localized_name
            {
                return Err(StoreError::UniqueViolation {
                    constraint: "idx_games_manual_localized_name".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Game store backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    state: RwLock<MemoryState>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a review for a game; the review's own id is replaced
    pub async fn add_review(&self, game_id: LocalId, mut review: ReviewRow, is_published: bool) -> ReviewId {
        let mut state = self.state.write().await;
        state.next_review_id += 1;
        let id = state.next_review_id;
        review.id = id;
        state.reviews.insert(
            id,
            StoredReview {
                game_id,
                review,
                is_published,
            },
        );
        id
    }

    /// Record a like; repeated likes by the same user count once
    pub async fn add_like(&self, review_id: ReviewId, user_id: UserId) {
        let mut state = self.state.write().await;
        state.likes.entry(review_id).or_default().insert(user_id);
    }

    pub async fn add_vote(&self, review_id: ReviewId, kind: VoteKind, value: impl Into<String>) {
        let mut state = self.state.write().await;
        state.votes.insert((review_id, kind, value.into()));
    }

    pub async fn game_count(&self) -> usize {
        self.state.read().await.games.len()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn find_by_id(&self, id: LocalId) -> Result<Option<GameRecord>, StoreError> {
        Ok(self.state.read().await.games.get(&id).cloned())
    }

    async fn find_by_catalog_id(
        &self,
        catalog_id: CatalogId,
    ) -> Result<Option<GameRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .games
            .values()
            .find(|g| g.catalog_id == Some(catalog_id))
            .cloned())
    }

    async fn find_manual_by_localized_name(
        &self,
        localized_name: &str,
    ) -> Result<Option<GameRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .games
            .values()
            .find(|g| g.catalog_id.is_none() && g.localized_name.as_deref() == Some(localized_name))
            .cloned())
    }

    async fn insert_game(&self, record: &GameRecord) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.check_unique(record)?;
        state.games.insert(record.id, record.clone());
        Ok(())
    }

    async fn update_game(&self, record: &GameRecord) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match state.games.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(record.id)),
        }
    }

    async fn update_rating(
        &self,
        id: LocalId,
        average: f64,
        count: u32,
        source: RatingSource,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let game = state.games.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        game.rating_average = Some(average);
        game.rating_count = count;
        game.rating_source = source;
        game.updated_at = Utc::now();
        Ok(())
    }

    async fn max_id_from(&self, floor: LocalId) -> Result<Option<LocalId>, StoreError> {
        let state = self.state.read().await;
        Ok(state.games.range(floor..).next_back().map(|(id, _)| *id))
    }

    async fn published_reviews(&self, game_id: LocalId) -> Result<Vec<ReviewRow>, StoreError> {
        let state = self.state.read().await;
        Ok(state.published_for(game_id).map(|r| r.review.clone()).collect())
    }

    async fn like_counts(
        &self,
        review_ids: &[ReviewId],
    ) -> Result<HashMap<ReviewId, u32>, StoreError> {
        let state = self.state.read().await;
        Ok(review_ids
            .iter()
            .filter_map(|id| state.likes.get(id).map(|users| (*id, users.len() as u32)))
            .collect())
    }

    async fn published_review_counts(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, u32>, StoreError> {
        let state = self.state.read().await;
        let wanted: HashSet<&UserId> = user_ids.iter().collect();
        let mut counts = HashMap::new();
        for stored in state.reviews.values().filter(|r| r.is_published) {
            if wanted.contains(&stored.review.user_id) {
                *counts.entry(stored.review.user_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn review_votes(
        &self,
        game_id: LocalId,
        kind: VoteKind,
    ) -> Result<Vec<TagVote>, StoreError> {
        let state = self.state.read().await;
        let published: HashSet<ReviewId> = state.published_for(game_id).map(|r| r.review.id).collect();

        let mut tally: BTreeMap<&str, u32> = BTreeMap::new();
        for (review_id, vote_kind, value) in &state.votes {
            if *vote_kind == kind && published.contains(review_id) {
                *tally.entry(value.as_str()).or_insert(0) += 1;
            }
        }

        Ok(tally
            .into_iter()
            .map(|(value, votes)| TagVote {
                value: value.to_string(),
                votes,
            })
            .collect())
    }

    async fn published_review_total(&self, game_id: LocalId) -> Result<u32, StoreError> {
        let state = self.state.read().await;
        Ok(state.published_for(game_id).count() as u32)
    }
}

// ============================================================================
// Catalog and translator doubles
// ============================================================================

/// Catalog lookup over a fixed set of games
#[derive(Debug, Default)]
pub struct StaticCatalog {
    games: RwLock<HashMap<CatalogId, CatalogGame>>,
    failing: AtomicBool,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_games(games: impl IntoIterator<Item = CatalogGame>) -> Self {
        Self {
            games: RwLock::new(games.into_iter().map(|g| (g.catalog_id, g)).collect()),
            failing: AtomicBool::new(false),
        }
    }

    /// Add or replace a game
    pub async fn insert(&self, game: CatalogGame) {
        self.games.write().await.insert(game.catalog_id, game);
    }

    /// Make every lookup fail as an unreachable service would
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogLookup for StaticCatalog {
    async fn fetch_game(&self, catalog_id: CatalogId) -> anyhow::Result<Option<CatalogGame>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow!("catalog service unreachable"));
        }
        Ok(self.games.read().await.get(&catalog_id).cloned())
    }
}

#[derive(Debug, Clone)]
enum TranslatorMode {
    Prefix(String),
    Fail,
}

/// Deterministic translator
#[derive(Debug, Clone)]
pub struct StaticTranslator {
    mode: TranslatorMode,
}

impl StaticTranslator {
    /// Returns text unchanged
    pub fn identity() -> Self {
        Self::prefixing("")
    }

    /// Returns text with a fixed prefix
    pub fn prefixing(prefix: impl Into<String>) -> Self {
        Self {
            mode: TranslatorMode::Prefix(prefix.into()),
        }
    }

    /// Fails every call
    pub fn failing() -> Self {
        Self {
            mode: TranslatorMode::Fail,
        }
    }
}

#[async_trait]
impl Translator for StaticTranslator {
    async fn translate(&self, text: &str) -> anyhow::Result<String> {
        match &self.mode {
            TranslatorMode::Prefix(prefix) => Ok(format!("{}{}", prefix, text)),
            TranslatorMode::Fail => Err(anyhow!("translation service unavailable")),
        }
    }
}
