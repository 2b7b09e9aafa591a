//! Global context for Berth operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::core::workspace::{find_manifest as ws_find_manifest, ManifestError};

/// Environment variable overriding the Berth home directory.
pub const BERTH_HOME_ENV: &str = "BERTH_HOME";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Berth data (~/.berth/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = match std::env::var_os(BERTH_HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => BaseDirs::new()
                .map(|b| b.home_dir().join(".berth"))
                .unwrap_or_else(|| PathBuf::from(".berth")),
        };

        Ok(GlobalContext {
            cwd,
            home,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Create a GlobalContext with a specific home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Berth home directory (~/.berth/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the default package store directory.
    pub fn store_dir(&self) -> PathBuf {
        self.home.join("store")
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project-local Berth directory.
    pub fn project_berth_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(".berth")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self, project_root: &Path) -> PathBuf {
        self.project_berth_dir(project_root).join("config.toml")
    }

    /// Find Berth.toml starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        ws_find_manifest(&self.cwd)
    }
}
