//! # BGR Common Library
//!
//! Shared code for the BGR crates:
//! - Error and result types
//! - TOML bootstrap configuration and logging setup
//! - SQLite database initialization

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
