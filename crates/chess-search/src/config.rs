//! Search configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading a search configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The file is not valid TOML or has fields of the wrong type.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Tuning knobs for [`Searcher`](crate::Searcher).
///
/// Every field has a default, so an empty file is a valid configuration:
///
/// ```toml
/// max_depth = 5
/// quiescence_depth = 8
/// use_book = false
/// mobility_weight = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Deepest iteration of iterative deepening. Zero is treated as one.
    pub max_depth: u32,
    /// Hard cap on quiescence plies below the main search horizon.
    pub quiescence_depth: u32,
    /// Consult the opening book before searching.
    pub use_book: bool,
    /// Centipawns per pseudo-legal move of mobility difference.
    pub mobility_weight: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 4,
            quiescence_depth: 8,
            use_book: true,
            mobility_weight: 0,
        }
    }
}

impl SearchConfig {
    /// Default settings searching to `max_depth`.
    pub fn with_depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth,
            ..Self::default()
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] for invalid TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, or
    /// [`ConfigError::ParseError`] if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
