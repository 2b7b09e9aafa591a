//! Requirement declarations and resolved dependencies.
//!
//! A [`Requirement`] is what the application asks for: a `name/version`
//! coordinate plus option overrides. A [`ResolvedDependency`] is what the
//! dependency engine hands back once the requirement is satisfied.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::errors::BuildError;

/// A package option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

/// Option overrides, keyed by option name.
pub type Options = BTreeMap<String, OptionValue>;

/// Name of the option that selects a shared-library build.
pub const SHARED_OPTION: &str = "shared";

/// A single requirement declaration.
///
/// The coordinate is kept verbatim; it is only parsed when the dependency
/// engine resolves it, so a malformed entry surfaces as a configuration
/// error from the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "ref", default)]
    reference: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    options: Options,
}

impl Requirement {
    /// Create a requirement for a `name/version` coordinate.
    pub fn new(reference: impl Into<String>) -> Self {
        Requirement {
            reference: reference.into(),
            options: Options::new(),
        }
    }

    /// Set an option override.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Shorthand for `shared = true`.
    pub fn shared(self) -> Self {
        self.with_option(SHARED_OPTION, true)
    }

    /// The raw coordinate string.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The option overrides.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Parse the coordinate.
    pub fn package_ref(&self) -> Result<PackageRef, BuildError> {
        PackageRef::parse(&self.reference)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reference.is_empty() {
            write!(f, "<missing ref>")?;
        } else {
            write!(f, "{}", self.reference)?;
        }
        if !self.options.is_empty() {
            let opts: Vec<String> = self
                .options
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, " [{}]", opts.join(", "))?;
        }
        Ok(())
    }
}

/// Requirement entry as it appears in Berth.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementSpec {
    /// Bare coordinate: `"fmt/10.1.1"`
    Simple(String),

    /// Coordinate with options: `{ ref = "zlib/1.3", options = { shared = true } }`
    Detailed(Requirement),
}

impl RequirementSpec {
    pub fn into_requirement(self) -> Requirement {
        match self {
            RequirementSpec::Simple(reference) => Requirement::new(reference),
            RequirementSpec::Detailed(req) => req,
        }
    }
}

/// The version half of a coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// `sdl/2.28.3`
    Exact(String),
    /// `sdl/[>=2.26 <3]`
    Range(VersionReq),
}

impl VersionSpec {
    fn parse(text: &str, reference: &str) -> Result<Self, BuildError> {
        match text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            Some(inner) => {
                let normalized = inner
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(", ");
                let req = VersionReq::parse(&normalized).map_err(|e| {
                    BuildError::configuration(format!(
                        "invalid version range in `{}`: {}",
                        reference, e
                    ))
                })?;
                Ok(VersionSpec::Range(req))
            }
            None => Ok(VersionSpec::Exact(text.to_string())),
        }
    }

    /// Check whether an available version string satisfies this requirement.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            VersionSpec::Exact(v) => v == candidate,
            VersionSpec::Range(req) => lenient_version(candidate)
                .map(|v| req.matches(&v))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Exact(v) => write!(f, "{}", v),
            VersionSpec::Range(req) => write!(f, "[{}]", req),
        }
    }
}

/// Parse a version, padding `1.3` to `1.3.0` the way C library versions
/// are usually written.
pub fn lenient_version(text: &str) -> Option<Version> {
    if let Ok(v) = Version::parse(text) {
        return Some(v);
    }
    let parts = text.split('.').count();
    match parts {
        1 => Version::parse(&format!("{}.0.0", text)).ok(),
        2 => Version::parse(&format!("{}.0", text)).ok(),
        _ => None,
    }
}

/// A parsed `name/version` coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub name: String,
    pub version: VersionSpec,
}

impl PackageRef {
    /// Parse a coordinate such as `sdl/2.28.3` or `sdl/[>=2.26 <3]`.
    pub fn parse(reference: &str) -> Result<Self, BuildError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(BuildError::configuration(
                "requirement is missing its `ref` coordinate",
            ));
        }

        let (name, version) = reference.split_once('/').ok_or_else(|| {
            BuildError::configuration(format!(
                "invalid requirement `{}`: expected `name/version`",
                reference
            ))
        })?;

        validate_package_name(name).map_err(|msg| {
            BuildError::configuration(format!("invalid requirement `{}`: {}", reference, msg))
        })?;

        if version.is_empty() {
            return Err(BuildError::configuration(format!(
                "invalid requirement `{}`: missing version",
                reference
            )));
        }

        Ok(PackageRef {
            name: name.to_string(),
            version: VersionSpec::parse(version, reference)?,
        })
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

fn validate_package_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("missing package name");
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'));
    if !valid {
        return Err("package names may only contain letters, digits, `_`, `-`, `.` and `+`");
    }
    // Names become store directory names.
    if name.starts_with('.') {
        return Err("package names may not start with `.`");
    }
    Ok(())
}

/// A dependency after the engine has resolved it.
///
/// Only the directory lists are read by berth; the rest is carried for
/// generators and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    /// Package name
    pub name: String,

    /// Concrete version picked by the engine
    pub version: String,

    /// Effective options (package defaults overlaid by the requirement)
    pub options: Options,

    /// Package root directory
    pub root: PathBuf,

    /// Directories holding runtime shared libraries, in priority order
    pub bin_dirs: Vec<PathBuf>,

    /// Directories holding link-time libraries
    pub lib_dirs: Vec<PathBuf>,

    /// Directories holding public headers
    pub include_dirs: Vec<PathBuf>,
}

impl ResolvedDependency {
    /// Create a dependency with no artifact directories.
    pub fn new(name: impl Into<String>, version: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        ResolvedDependency {
            name: name.into(),
            version: version.into(),
            options: Options::new(),
            root: root.into(),
            bin_dirs: Vec::new(),
            lib_dirs: Vec::new(),
            include_dirs: Vec::new(),
        }
    }

    /// Add a binary directory.
    pub fn with_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bin_dirs.push(dir.into());
        self
    }

    /// Directories holding this dependency's runtime shared libraries.
    pub fn binary_directories(&self) -> &[PathBuf] {
        &self.bin_dirs
    }

    /// The directory staging reads from, if any.
    pub fn primary_bin_dir(&self) -> Option<&Path> {
        self.binary_directories().first().map(PathBuf::as_path)
    }

    /// `name/version` of the resolved package.
    pub fn coordinate(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}
