//! Weighted score over persisted reviews

use super::engine::{ScoreEngine, WeightedScore};
use crate::error::ServiceError;
use crate::ports::GameStore;
use crate::types::{LocalId, RatingSource, ReviewId, UserId};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads review data for a game and runs the score engine
pub struct WeightedScoreService {
    store: Arc<dyn GameStore>,
    engine: ScoreEngine,
}

impl WeightedScoreService {
    pub fn new(store: Arc<dyn GameStore>, engine: ScoreEngine) -> Self {
        Self { store, engine }
    }

    /// Compute without writing anything
    pub async fn compute(&self, game_id: LocalId) -> Result<WeightedScore, ServiceError> {
        let game = self
            .store
            .find_by_id(game_id)
            .await?
            .ok_or(ServiceError::GameNotFound(game_id))?;

        let reviews = self.store.published_reviews(game_id).await?;
        if reviews.is_empty() {
            debug!("Game {} has no published reviews", game_id);
        }

        let review_ids: Vec<ReviewId> = reviews.iter().map(|r| r.id).collect();
        let user_ids: Vec<UserId> = reviews
            .iter()
            .map(|r| r.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let like_counts = self.store.like_counts(&review_ids).await?;
        let review_counts = self.store.published_review_counts(&user_ids).await?;

        Ok(self
            .engine
            .score(&reviews, &like_counts, &review_counts, game.rating_average))
    }

    /// Compute and write the aggregate back to the game
    ///
    /// The stored score is rounded to two decimals. Insufficient data leaves
    /// the stored aggregate untouched.
    pub async fn refresh(&self, game_id: LocalId) -> Result<WeightedScore, ServiceError> {
        let score = self.compute(game_id).await?;
        if score.is_insufficient() {
            return Ok(score);
        }

        let rounded = (score.weighted_score * 100.0).round() / 100.0;
        self.store
            .update_rating(game_id, rounded, score.total_reviews, RatingSource::Reviews)
            .await?;

        info!(
            "Updated rating for game {}: {:.2} from {} reviews (confidence {:.2})",
            game_id, rounded, score.total_reviews, score.confidence_level
        );

        Ok(score)
    }
}
