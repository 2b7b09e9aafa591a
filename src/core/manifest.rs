//! Berth.toml manifest parsing and schema.
//!
//! The manifest names the application and lists its base requirement set:
//!
//! ```toml
//! requirements = [
//!     "fmt/10.1.1",
//!     { ref = "zlib/1.3", options = { shared = false } },
//! ]
//!
//! [package]
//! name = "rogue"
//! version = "0.1.0"
//! ```
//!
//! Requirements are kept in the order written; berth never reorders or
//! filters them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::requirement::{Requirement, RequirementSpec};
use crate::errors::BuildError;
use crate::util::fs::read_to_string;

/// `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Application name
    pub name: String,

    /// Application version
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    requirements: Vec<RequirementSpec>,

    package: PackageMetadata,
}

/// A parsed manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    package: PackageMetadata,
    requirements: Vec<Requirement>,
    path: PathBuf,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let contents = read_to_string(path)?;
        Self::parse(&contents, path)
    }

    /// Parse manifest text. `path` is only used for error locations.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, BuildError> {
        let raw: RawManifest = toml::from_str(contents)
            .map_err(|e| BuildError::invalid_toml("manifest", path, contents, &e))?;

        if raw.package.name.trim().is_empty() {
            return Err(BuildError::Configuration {
                message: "`package.name` must not be empty".to_string(),
                location: Some(path.to_path_buf()),
            });
        }

        Ok(Manifest {
            package: raw.package,
            requirements: raw
                .requirements
                .into_iter()
                .map(RequirementSpec::into_requirement)
                .collect(),
            path: path.to_path_buf(),
        })
    }

    /// Get the package metadata.
    pub fn package(&self) -> &PackageMetadata {
        &self.package
    }

    /// Get the application name.
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// The base requirement set, in manifest order.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Path the manifest was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Render a fresh manifest for `berth init`.
pub fn render_template(name: &str) -> String {
    format!(
        r#"# Base requirements, applied on every platform.
# Platform-specific requirements are added by berth automatically.
requirements = []

[package]
name = "{}"
version = "0.1.0"
"#,
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::requirement::OptionValue;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::parse(
            r#"
requirements = [
    "fmt/10.1.1",
    { ref = "zlib/1.3", options = { shared = false } },
]

[package]
name = "rogue"
version = "0.1.0"
"#,
            Path::new("Berth.toml"),
        )
        .unwrap();

        assert_eq!(manifest.name(), "rogue");
        assert_eq!(manifest.package().version.as_deref(), Some("0.1.0"));
        assert_eq!(manifest.requirements().len(), 2);
        assert_eq!(manifest.requirements()[0].reference(), "fmt/10.1.1");
        assert_eq!(
            manifest.requirements()[1].options().get("shared"),
            Some(&OptionValue::Bool(false))
        );
    }

    #[test]
    fn test_requirements_default_to_empty() {
        let manifest =
            Manifest::parse("[package]\nname = \"rogue\"\n", Path::new("Berth.toml")).unwrap();
        assert!(manifest.requirements().is_empty());
    }

    #[test]
    fn test_entry_without_ref_still_parses() {
        let manifest = Manifest::parse(
            "requirements = [{ options = { shared = true } }]\n[package]\nname = \"rogue\"\n",
            Path::new("Berth.toml"),
        )
        .unwrap();
        assert_eq!(manifest.requirements()[0].reference(), "");
    }

    #[test]
    fn test_parse_error_has_position() {
        let err = Manifest::parse(
            "[package]\nname = rogue\n",
            Path::new("Berth.toml"),
        )
        .unwrap_err();

        match err {
            BuildError::Configuration { message, location } => {
                assert!(message.contains("line 2"), "{}", message);
                assert_eq!(location, Some(PathBuf::from("Berth.toml")));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_package_section() {
        let err = Manifest::parse("requirements = []\n", Path::new("Berth.toml")).unwrap_err();
        assert!(matches!(err, BuildError::Configuration { .. }));
    }

    #[test]
    fn test_template_round_trips() {
        let manifest = Manifest::parse(&render_template("rogue"), Path::new("Berth.toml")).unwrap();
        assert_eq!(manifest.name(), "rogue");
        assert!(manifest.requirements().is_empty());
    }
}
