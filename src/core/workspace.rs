//! Workspace - the project being configured.
//!
//! A Workspace ties the manifest to its project root and decides where
//! build outputs go.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::layout::{Layout, DEFAULT_BUILD_DIR};
use crate::core::manifest::Manifest;
use crate::core::platform::PlatformProfile;
use crate::errors::BuildError;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Berth.toml";

/// Error finding a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Berth.toml` in `{}` or any parent directory", dir.display())]
    NotFound { dir: PathBuf },
}

/// Find the manifest in `start` or the nearest parent directory holding one.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_NAME))
        .find(|path| path.is_file())
        .ok_or_else(|| ManifestError::NotFound {
            dir: start.to_path_buf(),
        })
}

/// A project with a loaded manifest.
#[derive(Debug)]
pub struct Workspace {
    /// The parsed manifest
    manifest: Manifest,

    /// Directory containing the manifest
    root: PathBuf,

    /// Build root (defaults to `<root>/build`)
    build_root: PathBuf,
}

impl Workspace {
    /// Create a workspace from a manifest path.
    pub fn new(manifest_path: &Path) -> Result<Self, BuildError> {
        let manifest = Manifest::load(manifest_path)?;
        let root = manifest_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        Ok(Workspace {
            manifest,
            build_root: root.join(DEFAULT_BUILD_DIR),
            root,
        })
    }

    /// Override the build root. Relative paths are taken from the project root.
    pub fn with_build_root(mut self, build_root: impl AsRef<Path>) -> Self {
        self.build_root = self.root.join(build_root);
        self
    }

    /// Get the manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Get the project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the build root.
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// Get the directory layout for a profile.
    pub fn layout(&self, profile: &PlatformProfile) -> Layout {
        Layout::cmake_in(&self.root, &self.build_root, profile)
    }
}
