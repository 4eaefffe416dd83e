//! Traversal limits and their TOML representation.
//!
//! ```toml
//! [traversal]
//! detect_cycles = true
//! max_depth = 128
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const CONFIG_DIR: &str = "sombra-lineage";
const CONFIG_FILE: &str = "config.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Limits applied to every recursive traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraversalConfig {
    /// Fail with `CycleDetected` when a branch revisits a node on its own
    /// ancestry chain.
    pub detect_cycles: bool,
    /// Maximum recursion depth before failing with `DepthLimitExceeded`.
    pub max_depth: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: 256,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    traversal: TraversalConfig,
}

impl TraversalConfig {
    /// No cycle checks and no depth limit; relies entirely on the edge set
    /// being acyclic.
    pub fn unchecked() -> Self {
        Self {
            detect_cycles: false,
            max_depth: usize::MAX,
        }
    }

    /// Tight limits for interactive use on untrusted data.
    pub fn strict() -> Self {
        Self {
            detect_cycles: true,
            max_depth: 32,
        }
    }

    /// Parses the `[traversal]` table of a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        file.traversal.validate()
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), ?config, "config.loaded");
        Ok(config)
    }

    /// Loads `explicit` if given, otherwise the per-user config file if it
    /// exists, otherwise the defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1"));
        }
        Ok(self)
    }
}

/// `<config dir>/sombra-lineage/config.toml`, when the platform has a config
/// directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
