//! Configuration loading and typed config structures for the service.
//!
//! The canonical configuration lives in `resonance-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads the file. Every
//! field has a default, so an absent or empty file yields a fully working
//! configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use resonance_types::DecayStrategy;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `resonance-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CorrelationConfig {
    /// Event log settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Query default settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Pattern detection bounds.
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Clustering bounds.
    #[serde(default)]
    pub clusters: ClusterConfig,

    /// Coordinate table asset settings.
    #[serde(default)]
    pub coordinates: CoordinatesConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CorrelationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Event log configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Path of the append-only JSONL event log.
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

/// Query default configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryConfig {
    /// Lookback window in hours used when a query omits one.
    #[serde(default = "default_window_hours")]
    pub default_window_hours: f64,

    /// Decay strategy used when a climate query omits one.
    #[serde(default)]
    pub decay: DecayStrategy,

    /// Centroid magnitude normalization ("magnitude = count / N").
    #[serde(default = "default_normalization")]
    pub normalization: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_window_hours: default_window_hours(),
            decay: DecayStrategy::default(),
            normalization: default_normalization(),
        }
    }
}

/// Pattern detection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatternConfig {
    /// Minimum repeated-sequence length used when a query omits one.
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Maximum repeated-sequence length used when a query omits one.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

/// Clustering configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClusterConfig {
    /// Upper bound on the anchor-to-member gap in hours. The per-query
    /// lookback window is capped at this value when grouping.
    #[serde(default = "default_max_window_hours")]
    pub max_window_hours: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_window_hours: default_max_window_hours(),
        }
    }
}

/// Coordinate table asset configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoordinatesConfig {
    /// Path of the YAML coordinate table. When unset (or unloadable) the
    /// builtin table is used.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_log_path() -> PathBuf {
    PathBuf::from("resonance-log.jsonl")
}

const fn default_window_hours() -> f64 {
    24.0
}

const fn default_normalization() -> f64 {
    10.0
}

const fn default_min_length() -> usize {
    3
}

const fn default_max_length() -> usize {
    10
}

const fn default_max_window_hours() -> f64 {
    24.0
}

fn default_log_level() -> String {
    "info".to_owned()
}
