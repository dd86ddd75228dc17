//! Bootstrap configuration, path resolution and logging setup
//!
//! Configuration is read from a single TOML file. A missing file is not an
//! error: callers get a warning and compiled defaults. A file that exists but
//! cannot be parsed is reported as [`Error::Config`].
//!
//! Database path resolution priority:
//! 1. Explicit argument (highest priority)
//! 2. Environment variable (`BGR_DATABASE_PATH`)
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted for the database path
pub const DATABASE_PATH_ENV: &str = "BGR_DATABASE_PATH";

/// First local id handed out to manually authored games.
///
/// Catalog-imported games keep their catalog id, which stays well below this.
pub const DEFAULT_MANUAL_ID_START: i64 = 10_000_000;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// JSON file with the taxonomy mapping tables (built-in tables when absent)
    #[serde(default)]
    pub mappings_path: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Game registration settings
    #[serde(default)]
    pub registration: RegistrationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Registration settings
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// First id of the reserved range for manually authored games
    #[serde(default = "default_manual_id_start")]
    pub manual_id_start: i64,

    /// Return the existing record instead of a conflict when a catalog id is
    /// registered twice and the caller did not say otherwise
    #[serde(default)]
    pub reuse_existing_by_default: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            manual_id_start: default_manual_id_start(),
            reuse_existing_by_default: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_manual_id_start() -> i64 {
    DEFAULT_MANUAL_ID_START
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from a TOML file
    ///
    /// A missing file yields defaults with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from the platform default location (`<config dir>/bgr/config.toml`)
    pub fn load_default() -> Result<Self> {
        match default_config_file() {
            Some(path) => Self::load(&path),
            None => {
                warn!("Could not determine config directory, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform default configuration file path
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bgr").join("config.toml"))
}

/// Resolve the database path following the documented priority order
pub fn resolve_database_path(explicit: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATABASE_PATH_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.database_path {
        return path.clone();
    }

    default_database_path()
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("bgr"))
        .unwrap_or_else(|| PathBuf::from("./bgr_data"))
        .join("bgr.db")
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is harmless: later calls leave the first subscriber in place.
pub fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| {
            Error::Config(format!("Invalid log level '{}': {}", logging.level, e))
        })?,
    };

    let (stderr_layer, file_layer) = match &logging.file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
    };

    if tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        debug!("Tracing subscriber already installed");
    }

    Ok(())
}
