//! Weighted review scoring

pub mod engine;
pub mod service;

pub use engine::{
    Methodology, ReviewWeight, ScoreEngine, ScoreWeights, TrustTier, WeightedScore,
};
pub use service::WeightedScoreService;
