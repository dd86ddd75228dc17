//! Trust-weighted review scoring
//!
//! Per-review weight = trust × quality × social. The weighted score is
//! Σ(rating × weight) / Σ(weight); confidence ramps linearly to 1.0 at
//! `full_confidence_reviews` reviews.

use crate::types::{ReviewId, ReviewRow, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tunable scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub admin_trust: f64,
    pub trusted_trust: f64,
    pub regular_trust: f64,
    pub new_trust: f64,
    /// Published reviews needed for the trusted tier
    pub trusted_min_reviews: u32,
    /// Published reviews needed for the regular tier
    pub regular_min_reviews: u32,

    pub short_quality: f64,
    pub normal_quality: f64,
    pub detailed_quality: f64,
    pub comprehensive_quality: f64,
    /// Bodies shorter than this are short
    pub short_max_chars: usize,
    pub detailed_min_chars: usize,
    /// Also requires pros or cons
    pub comprehensive_min_chars: usize,

    pub like_step: f64,
    pub max_social: f64,

    pub full_confidence_reviews: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            admin_trust: 1.5,
            trusted_trust: 1.2,
            regular_trust: 1.0,
            new_trust: 0.5,
            trusted_min_reviews: 10,
            regular_min_reviews: 3,
            short_quality: 0.8,
            normal_quality: 1.0,
            detailed_quality: 1.1,
            comprehensive_quality: 1.2,
            short_max_chars: 100,
            detailed_min_chars: 500,
            comprehensive_min_chars: 1000,
            like_step: 0.05,
            max_social: 1.2,
            full_confidence_reviews: 20,
        }
    }
}

/// Reviewer classification used only for weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustTier {
    Admin,
    Trusted,
    Regular,
    New,
}

/// How a score was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    WeightedAlgorithm,
    /// No reviews; both scores echo the stored average
    InsufficientData,
}

/// Weight breakdown for one review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewWeight {
    pub review_id: ReviewId,
    pub user_id: UserId,
    pub rating: f64,
    pub trust_tier: TrustTier,
    pub trust_factor: f64,
    pub quality_factor: f64,
    pub social_factor: f64,
    pub weight: f64,
    pub user_review_count: u32,
    pub content_length: usize,
    pub like_count: u32,
}

/// Aggregate score for a game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedScore {
    pub simple_average: f64,
    pub weighted_score: f64,
    pub confidence_level: f64,
    pub total_reviews: u32,
    pub methodology: Methodology,
    pub review_weights: Vec<ReviewWeight>,
}

impl WeightedScore {
    pub fn is_insufficient(&self) -> bool {
        self.methodology == Methodology::InsufficientData
    }
}

/// Stateless scoring engine
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    weights: ScoreWeights,
}

impl ScoreEngine {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Score a set of published reviews
    ///
    /// Missing like counts read as 0 and missing review counts as 0 (new
    /// tier). With no reviews, `stored_average` (or 0) is returned as both
    /// scores with confidence 0.
    pub fn score(
        &self,
        reviews: &[ReviewRow],
        like_counts: &HashMap<ReviewId, u32>,
        review_counts: &HashMap<UserId, u32>,
        stored_average: Option<f64>,
    ) -> WeightedScore {
        if reviews.is_empty() {
            let average = stored_average.unwrap_or(0.0);
            return WeightedScore {
                simple_average: average,
                weighted_score: average,
                confidence_level: 0.0,
                total_reviews: 0,
                methodology: Methodology::InsufficientData,
                review_weights: Vec::new(),
            };
        }

        let review_weights: Vec<ReviewWeight> = reviews
            .iter()
            .map(|review| {
                self.weigh(
                    review,
                    like_counts.get(&review.id).copied().unwrap_or(0),
                    review_counts.get(&review.user_id).copied().unwrap_or(0),
                )
            })
            .collect();

        let count = reviews.len() as f64;
        let simple_average = reviews.iter().map(|r| r.rating).sum::<f64>() / count;

        let total_weight: f64 = review_weights.iter().map(|w| w.weight).sum();
        let weighted_sum: f64 = review_weights.iter().map(|w| w.rating * w.weight).sum();
        let weighted_score = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            simple_average
        };

        WeightedScore {
            simple_average,
            weighted_score,
            confidence_level: self.confidence(reviews.len()),
            total_reviews: reviews.len() as u32,
            methodology: Methodology::WeightedAlgorithm,
            review_weights,
        }
    }

    /// Weight breakdown for a single review
    pub fn weigh(&self, review: &ReviewRow, like_count: u32, user_review_count: u32) -> ReviewWeight {
        let trust_tier = self.trust_tier(review.reviewer_is_admin, user_review_count);
        let trust_factor = self.trust_factor(trust_tier);
        let content_length = review.content.chars().count();
        let has_pros_or_cons = !review.pros.is_empty() || !review.cons.is_empty();
        let quality_factor = self.quality_factor(content_length, has_pros_or_cons);
        let social_factor = self.social_factor(like_count);

        ReviewWeight {
            review_id: review.id,
            user_id: review.user_id,
            rating: review.rating,
            trust_tier,
            trust_factor,
            quality_factor,
            social_factor,
            weight: trust_factor * quality_factor * social_factor,
            user_review_count,
            content_length,
            like_count,
        }
    }

    pub fn trust_tier(&self, is_admin: bool, published_reviews: u32) -> TrustTier {
        if is_admin {
            TrustTier::Admin
        } else if published_reviews >= self.weights.trusted_min_reviews {
            TrustTier::Trusted
        } else if published_reviews >= self.weights.regular_min_reviews {
            TrustTier::Regular
        } else {
            TrustTier::New
        }
    }

    pub fn trust_factor(&self, tier: TrustTier) -> f64 {
        match tier {
            TrustTier::Admin => self.weights.admin_trust,
            TrustTier::Trusted => self.weights.trusted_trust,
            TrustTier::Regular => self.weights.regular_trust,
            TrustTier::New => self.weights.new_trust,
        }
    }

    /// Quality factor from body length in characters
    ///
    /// A long body without pros or cons counts as detailed, not comprehensive.
    pub fn quality_factor(&self, content_length: usize, has_pros_or_cons: bool) -> f64 {
        let w = &self.weights;
        if content_length >= w.comprehensive_min_chars && has_pros_or_cons {
            w.comprehensive_quality
        } else if content_length >= w.detailed_min_chars {
            w.detailed_quality
        } else if content_length < w.short_max_chars {
            w.short_quality
        } else {
            w.normal_quality
        }
    }

    pub fn social_factor(&self, like_count: u32) -> f64 {
        (1.0 + f64::from(like_count) * self.weights.like_step).min(self.weights.max_social)
    }

    pub fn confidence(&self, review_count: usize) -> f64 {
        if self.weights.full_confidence_reviews == 0 {
            return 1.0;
        }
        (review_count as f64 / f64::from(self.weights.full_confidence_reviews)).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn review(id: ReviewId, rating: f64, content_len: usize) -> ReviewRow {
        ReviewRow {
            id,
            user_id: Uuid::new_v4(),
            rating,
            content: "a".repeat(content_len),
            pros: Vec::new(),
            cons: Vec::new(),
            reviewer_is_admin: false,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_zero_reviews_echo_stored_average() {
        let engine = ScoreEngine::default();
        let score = engine.score(&[], &HashMap::new(), &HashMap::new(), Some(7.3));

        assert_eq!(score.confidence_level, 0.0);
        assert_eq!(score.simple_average, 7.3);
        assert_eq!(score.weighted_score, 7.3);
        assert!(score.is_insufficient());
    }

    #[test]
    fn test_zero_reviews_without_stored_average() {
        let score = ScoreEngine::default().score(&[], &HashMap::new(), &HashMap::new(), None);
        assert_eq!(score.weighted_score, 0.0);
        assert_eq!(score.methodology, Methodology::InsufficientData);
    }

    #[test]
    fn test_identical_weights_equal_simple_average() {
        let reviews = vec![review(1, 9.0, 200), review(2, 6.0, 200), review(3, 7.5, 200)];
        let score = ScoreEngine::default().score(&reviews, &HashMap::new(), &HashMap::new(), None);

        assert_close(score.simple_average, 7.5);
        assert_close(score.weighted_score, score.simple_average);
        assert_eq!(score.methodology, Methodology::WeightedAlgorithm);
    }

    #[test]
    fn test_heavier_review_pulls_score() {
        let mut expert = review(1, 9.0, 1200);
        expert.reviewer_is_admin = true;
        expert.pros = vec!["Tight decisions".to_string()];
        let newcomer = review(2, 5.0, 50);

        let score = ScoreEngine::default().score(
            &[expert, newcomer],
            &HashMap::new(),
            &HashMap::new(),
            None,
        );

        // 1.5 * 1.2 = 1.8 vs 0.5 * 0.8 = 0.4
        assert_close(score.review_weights[0].weight, 1.8);
        assert_close(score.review_weights[1].weight, 0.4);
        assert_close(score.weighted_score, (9.0 * 1.8 + 5.0 * 0.4) / 2.2);
        assert_close(score.simple_average, 7.0);
    }

    #[test]
    fn test_trust_tiers() {
        let engine = ScoreEngine::default();
        assert_eq!(engine.trust_tier(true, 0), TrustTier::Admin);
        assert_eq!(engine.trust_tier(false, 10), TrustTier::Trusted);
        assert_eq!(engine.trust_tier(false, 9), TrustTier::Regular);
        assert_eq!(engine.trust_tier(false, 3), TrustTier::Regular);
        assert_eq!(engine.trust_tier(false, 2), TrustTier::New);
        assert_eq!(engine.trust_factor(TrustTier::New), 0.5);
    }

    #[test]
    fn test_quality_factor() {
        let engine = ScoreEngine::default();
        assert_eq!(engine.quality_factor(99, true), 0.8);
        assert_eq!(engine.quality_factor(100, false), 1.0);
        assert_eq!(engine.quality_factor(499, false), 1.0);
        assert_eq!(engine.quality_factor(500, false), 1.1);
        assert_eq!(engine.quality_factor(1000, false), 1.1);
        assert_eq!(engine.quality_factor(1000, true), 1.2);
    }

    #[test]
    fn test_quality_counts_characters_not_bytes() {
        let mut r = review(1, 8.0, 0);
        // 100 three-byte characters
        r.content = "面".repeat(100);
        let weight = ScoreEngine::default().weigh(&r, 0, 3);
        assert_eq!(weight.content_length, 100);
        assert_eq!(weight.quality_factor, 1.0);
    }

    #[test]
    fn test_social_factor_caps() {
        let engine = ScoreEngine::default();
        assert_eq!(engine.social_factor(0), 1.0);
        assert_close(engine.social_factor(2), 1.1);
        assert_close(engine.social_factor(4), 1.2);
        assert_close(engine.social_factor(50), 1.2);
    }

    #[test]
    fn test_confidence_ramp() {
        let engine = ScoreEngine::default();
        assert_eq!(engine.confidence(0), 0.0);
        assert_eq!(engine.confidence(5), 0.25);
        assert_eq!(engine.confidence(20), 1.0);
        assert_eq!(engine.confidence(45), 1.0);
    }

    #[test]
    fn test_lookups_by_id() {
        let r = review(42, 8.0, 150);
        let likes = HashMap::from([(42, 3)]);
        let counts = HashMap::from([(r.user_id, 12)]);

        let score = ScoreEngine::default().score(&[r], &likes, &counts, None);
        let weight = &score.review_weights[0];
        assert_eq!(weight.like_count, 3);
        assert_eq!(weight.user_review_count, 12);
        assert_eq!(weight.trust_tier, TrustTier::Trusted);
    }
}
