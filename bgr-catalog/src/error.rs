//! Error types for bgr-catalog
//!
//! Only persistence and the registration orchestrator have real failure
//! modes. Taxonomy mapping, localization, reconciliation and scoring never
//! fail; degenerate inputs produce empty or seeded outputs instead.

use crate::types::LocalId;
use thiserror::Error;

/// Persistence error
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Record to update does not exist
    #[error("Game {0} not found")]
    NotFound(LocalId),

    /// JSON column could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored value outside its valid domain
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Classify a write failure, separating uniqueness violations
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation {
                    constraint: db_err.message().to_string(),
                }
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Registration orchestrator error
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Game already registered (by catalog id or manual localized name)
    ///
    /// Recoverable by fetching `existing_id` instead.
    #[error("Conflict: {message} (existing game {existing_id})")]
    Conflict { existing_id: LocalId, message: String },

    /// Catalog lookup returned nothing or failed
    #[error("Catalog source unavailable: {0}")]
    SourceUnavailable(String),

    /// Caller input rejected; every problem found is listed
    #[error("Validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    /// Re-sync target does not exist
    #[error("Game {0} not found")]
    NotFound(LocalId),

    /// Persistence failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Error from the read-side services (weighted score, stats)
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Game {0} not found")]
    GameNotFound(LocalId),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
