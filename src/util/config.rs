//! Configuration file support for Berth.
//!
//! Berth supports two configuration file locations:
//! - Global: `~/.berth/config.toml` - User-wide defaults
//! - Project: `.berth/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::platform::ProfileOverrides;
use crate::errors::BuildError;
use crate::util::fs::read_to_string;

/// Berth configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default platform settings
    pub profile: ProfileOverrides,

    /// Package store settings
    pub store: StoreConfig,

    /// Toolchain file generation settings
    pub toolchain: ToolchainConfig,
}

/// Package store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the local package store
    pub path: Option<PathBuf>,
}

/// Toolchain file generation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Write CMakeUserPresets.json at the project root (default: false)
    pub user_presets: Option<bool>,

    /// Build root, relative to the project root (default: "build")
    pub build_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let contents = read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| BuildError::invalid_toml("config file", path, &contents, &e))
    }

    /// Load configuration, or defaults if the file doesn't exist.
    /// A file that exists but does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, BuildError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        self.profile.merge(&other.profile);

        if other.store.path.is_some() {
            self.store.path = other.store.path;
        }

        if other.toolchain.user_presets.is_some() {
            self.toolchain.user_presets = other.toolchain.user_presets;
        }
        if other.toolchain.build_dir.is_some() {
            self.toolchain.build_dir = other.toolchain.build_dir;
        }
    }

    /// Whether to write the user presets file.
    pub fn user_presets(&self) -> bool {
        self.toolchain.user_presets.unwrap_or(false)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.berth/config.toml)
/// 2. Global config (~/.berth/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Result<Config, BuildError> {
    let mut config = Config::default();
    config.merge(Config::load_or_default(global_path)?);
    config.merge(Config::load_or_default(project_path)?);
    Ok(config)
}
