//! Local package store - prebuilt packages on disk.
//!
//! Layout:
//!
//! ```text
//! <store>/<name>/<version>/package.toml       package metadata (optional)
//! <store>/<name>/<version>/bin, lib, include  default artifact directories
//! <store>/<name>/<version>/options/<opt>-<value>/
//!                                             binary variant for an option override
//! ```
//!
//! `package.toml`:
//!
//! ```toml
//! [cpp_info]
//! bindirs = ["bin"]
//! libdirs = ["lib"]
//! includedirs = ["include"]
//!
//! [options]
//! shared = false
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::requirement::{
    lenient_version, Options, PackageRef, Requirement, ResolvedDependency, VersionSpec,
};
use crate::errors::BuildError;
use crate::resolver::errors::ResolveError;
use crate::sources::DependencyEngine;
use crate::util::fs::read_to_string;

/// Name of the per-package metadata file.
pub const PACKAGE_INFO_FILE: &str = "package.toml";

/// Package metadata as stored in `package.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageInfo {
    /// Artifact directories, relative to the package root
    pub cpp_info: CppInfo,

    /// Declared options and their defaults
    pub options: Options,
}

/// Artifact directories. Unset fields fall back to the conventional
/// directory if it exists in the package.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CppInfo {
    pub bindirs: Option<Vec<PathBuf>>,
    pub libdirs: Option<Vec<PathBuf>>,
    pub includedirs: Option<Vec<PathBuf>>,
}

impl PackageInfo {
    /// Load `package.toml` from a package root, or defaults if absent.
    pub fn load(root: &Path) -> Result<Self, BuildError> {
        let path = root.join(PACKAGE_INFO_FILE);
        if !path.exists() {
            return Ok(PackageInfo::default());
        }

        let contents = read_to_string(&path)?;
        toml::from_str(&contents)
            .map_err(|e| BuildError::invalid_toml("package metadata", &path, &contents, &e))
    }
}

fn artifact_dirs(root: &Path, declared: Option<&[PathBuf]>, conventional: &str) -> Vec<PathBuf> {
    match declared {
        Some(dirs) => dirs.iter().map(|d| root.join(d)).collect(),
        None => {
            let dir = root.join(conventional);
            if dir.is_dir() {
                vec![dir]
            } else {
                Vec::new()
            }
        }
    }
}

/// A dependency engine backed by a directory of prebuilt packages.
#[derive(Debug)]
pub struct LocalStore {
    /// Store root
    root: PathBuf,

    /// Resolved packages in submission order
    resolved: Vec<ResolvedDependency>,

    /// Package name -> the requirement that claimed it
    declared: HashMap<String, String>,
}

impl LocalStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore {
            root: root.into(),
            resolved: Vec::new(),
            declared: HashMap::new(),
        }
    }

    /// Get the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn list_dirs(dir: &Path) -> Result<Vec<String>, BuildError> {
        let entries =
            fs::read_dir(dir).map_err(|e| BuildError::filesystem("read directory", dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BuildError::filesystem("read directory", dir, e))?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        Ok(names)
    }

    fn similar_packages(&self, name: &str) -> Vec<String> {
        let Ok(names) = Self::list_dirs(&self.root) else {
            return Vec::new();
        };

        let wanted = name.to_ascii_lowercase();
        let mut similar: Vec<String> = names
            .into_iter()
            .filter(|candidate| {
                let candidate = candidate.to_ascii_lowercase();
                candidate.contains(&wanted) || wanted.contains(&candidate)
            })
            .collect();
        similar.sort();
        similar
    }

    /// Pick the version directory that satisfies the requested version.
    fn select_version(&self, pkg_ref: &PackageRef, package_dir: &Path) -> Result<String, BuildError> {
        let mut available = Self::list_dirs(package_dir)?;
        available.sort_by(|a, b| match (lenient_version(a), lenient_version(b)) {
            (Some(va), Some(vb)) => va.cmp(&vb),
            _ => a.cmp(b),
        });

        let selected = match &pkg_ref.version {
            VersionSpec::Exact(v) => available.iter().find(|a| *a == v).cloned(),
            VersionSpec::Range(_) => available
                .iter()
                .filter(|a| pkg_ref.version.matches(a))
                .max_by_key(|a| lenient_version(a))
                .cloned(),
        };

        selected.ok_or_else(|| {
            ResolveError::NoMatchingVersion {
                package: pkg_ref.name.clone(),
                requirement: pkg_ref.version.to_string(),
                available,
            }
            .into()
        })
    }
}

impl DependencyEngine for LocalStore {
    fn name(&self) -> &str {
        "local store"
    }

    fn require(&mut self, requirement: &Requirement) -> Result<(), BuildError> {
        let pkg_ref = requirement.package_ref()?;

        if let Some(first) = self.declared.get(&pkg_ref.name) {
            return Err(ResolveError::DuplicateRequirement {
                package: pkg_ref.name.clone(),
                first: first.clone(),
                second: requirement.reference().to_string(),
            }
            .into());
        }

        let package_dir = self.root.join(&pkg_ref.name);
        if !package_dir.is_dir() {
            return Err(ResolveError::PackageNotFound {
                package: pkg_ref.name.clone(),
                suggestions: self.similar_packages(&pkg_ref.name),
            }
            .into());
        }

        let version = self.select_version(&pkg_ref, &package_dir)?;
        let version_dir = package_dir.join(&version);
        let info = PackageInfo::load(&version_dir)?;

        let mut options = info.options.clone();
        for (name, value) in requirement.options() {
            if !info.options.contains_key(name) {
                return Err(ResolveError::UnknownOption {
                    package: pkg_ref.name.clone(),
                    option: name.clone(),
                    known: info.options.keys().cloned().collect(),
                }
                .into());
            }
            options.insert(name.clone(), value.clone());
        }

        // An option override may select a prebuilt binary variant.
        let variant_root = requirement
            .options()
            .iter()
            .map(|(name, value)| version_dir.join("options").join(format!("{}-{}", name, value)))
            .find(|dir| dir.is_dir());

        let (root, cpp_info) = match variant_root {
            Some(dir) => {
                tracing::debug!("using binary variant {}", dir.display());
                let variant = PackageInfo::load(&dir)?;
                (dir, variant.cpp_info)
            }
            None => (version_dir, info.cpp_info),
        };

        let dependency = ResolvedDependency {
            name: pkg_ref.name.clone(),
            version,
            options,
            bin_dirs: artifact_dirs(&root, cpp_info.bindirs.as_deref(), "bin"),
            lib_dirs: artifact_dirs(&root, cpp_info.libdirs.as_deref(), "lib"),
            include_dirs: artifact_dirs(&root, cpp_info.includedirs.as_deref(), "include"),
            root,
        };

        tracing::info!("Resolved {}", dependency.coordinate());

        self.declared
            .insert(pkg_ref.name, requirement.reference().to_string());
        self.resolved.push(dependency);
        Ok(())
    }

    fn dependencies(&self) -> &[ResolvedDependency] {
        &self.resolved
    }
}
