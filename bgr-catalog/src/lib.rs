//! # BGR Catalog
//!
//! Catalog core for the board game review site:
//! - Game registration from the source catalog or manual input
//! - Taxonomy mapping onto the curated site categories and mechanics
//! - Localized (Japanese edition) name and publisher detection
//! - Player-count reconciliation between catalog polls and review votes
//! - Trust-weighted review scoring and per-game statistics
//!
//! Network and storage are reached through the traits in [`ports`];
//! [`db::SqliteGameStore`] is the production store.

pub mod db;
pub mod error;
pub mod localization;
pub mod memory;
pub mod player_counts;
pub mod ports;
pub mod registration;
pub mod scoring;
pub mod stats;
pub mod taxonomy;
pub mod types;

pub use db::SqliteGameStore;
pub use error::{RegistrationError, ServiceError, StoreError};
pub use registration::{CatalogRegistration, GameRegistrar, ManualGameInput, RegistrationOutcome};
pub use scoring::{ScoreEngine, WeightedScoreService};
pub use stats::{GameStats, StatsService};
pub use taxonomy::{MappingTables, TaxonomyMapper};
pub use types::{CatalogGame, GameRecord, LocalId, RatingSource};
