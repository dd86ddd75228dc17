//! Error type for bootstrap configuration and database setup

use thiserror::Error;

/// Result of the bgr-common setup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure while loading configuration, installing logging, or opening the
/// database
#[derive(Error, Debug)]
pub enum Error {
    /// Pool creation, pragma or schema statement failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the database directory or the log file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file unreadable or unparsable, or an invalid log filter
    #[error("Configuration error: {0}")]
    Config(String),
}
