//! Tool configuration from `pictor.toml`.
//!
//! # Sections
//!
//! ```toml
//! [limits]
//! max_dimension = 4096   # largest kept dimension in pixels
//! max_bytes = "4MB"      # payload budget before downscaling kicks in
//!
//! [store]
//! dir = "assets"         # where uploaded pictures land
//!
//! [svg]
//! cache_entries = 64     # memoized sanitizer results (LRU cap)
//! ```
//!
//! Every field has a default; a missing config file means "all defaults".
//! CLI flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::size::SizeLimits;
use crate::svg::sanitize::DEFAULT_CACHE_ENTRIES;

/// Default config filename, looked up in the working directory.
pub const CONFIG_FILE: &str = "pictor.toml";

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictorConfig {
    pub limits: LimitsConfig,
    pub store: StoreConfig,
    pub svg: SvgConfig,
}

impl PictorConfig {
    /// Load from an explicit path, or `pictor.toml` when it exists, or fall
    /// back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let raw = fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "limits.max_dimension must be greater than 0".to_string(),
            ));
        }
        if self.limits.max_bytes_len() == 0 {
            return Err(ConfigError::Validation(format!(
                "limits.max_bytes is not a valid size: `{}`",
                self.limits.max_bytes
            )));
        }
        Ok(())
    }

    /// Downscale limits for the sizing stage.
    pub fn size_limits(&self) -> SizeLimits {
        SizeLimits {
            max_dimension: self.limits.max_dimension,
            max_bytes: self.limits.max_bytes_len(),
        }
    }
}

/// `[limits]`: downscale thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest dimension an asset may keep, in pixels.
    pub max_dimension: u32,

    /// Payload budget. Supports suffixes: B, KB, MB (e.g. "512KB", "4MB").
    pub max_bytes: String,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_dimension: crate::size::MAX_DIMENSION,
            max_bytes: "4MB".to_string(),
        }
    }
}

impl LimitsConfig {
    /// Parse the byte budget to a length.
    pub fn max_bytes_len(&self) -> usize {
        parse_size_string(&self.max_bytes)
    }
}

/// `[store]`: where uploaded pictures land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
        }
    }
}

/// `[svg]`: sanitizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgConfig {
    /// Memoized sanitizer results kept in the LRU cache.
    pub cache_entries: usize,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            cache_entries: DEFAULT_CACHE_ENTRIES,
        }
    }
}

/// Parse size string (e.g., "10KB") to bytes
fn parse_size_string(s: &str) -> usize {
    let s = s.trim().to_uppercase();
    if s.ends_with("MB") {
        s.trim_end_matches("MB")
            .trim()
            .parse::<usize>()
            .unwrap_or(0)
            * 1024
            * 1024
    } else if s.ends_with("KB") {
        s.trim_end_matches("KB")
            .trim()
            .parse::<usize>()
            .unwrap_or(0)
            * 1024
    } else if s.ends_with('B') {
        s.trim_end_matches('B').trim().parse().unwrap_or(0)
    } else {
        s.parse().unwrap_or(0)
    }
}
