//! Implementation of `berth init`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::core::manifest::render_template;
use crate::core::workspace::MANIFEST_NAME;
use crate::util::fs::{ensure_dir, write_string};

/// Validate a package name.
pub fn validate_package_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("package name cannot be empty");
    }

    if name.starts_with('-') || name.starts_with('_') || name.starts_with('.') {
        return Err("package name cannot start with a hyphen, underscore or dot");
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err("package name contains invalid characters");
    }

    Ok(())
}

/// Package name from the directory, or `unnamed` if it has none.
pub fn default_package_name(path: &Path) -> String {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    resolved
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

/// Write a fresh `Berth.toml` into `path`, creating the directory if needed.
pub fn init_project(path: &Path, name: &str) -> Result<PathBuf> {
    if let Err(reason) = validate_package_name(name) {
        bail!("invalid package name `{}`: {}", name, reason);
    }

    let manifest_path = path.join(MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("`{}` already exists in `{}`", MANIFEST_NAME, path.display());
    }

    ensure_dir(path)?;
    write_string(&manifest_path, &render_template(name))?;
    tracing::debug!("Wrote {}", manifest_path.display());

    Ok(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Manifest;
    use tempfile::TempDir;

    #[test]
    fn test_init_project() {
        let tmp = TempDir::new().unwrap();
        let path = init_project(tmp.path(), "rogue").unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.name(), "rogue");
    }

    #[test]
    fn test_init_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("game");
        init_project(&dir, "game").unwrap();
        assert!(dir.join(MANIFEST_NAME).is_file());
    }

    #[test]
    fn test_init_refuses_existing_manifest() {
        let tmp = TempDir::new().unwrap();
        init_project(tmp.path(), "rogue").unwrap();

        let err = init_project(tmp.path(), "rogue").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_init_rejects_bad_name() {
        let tmp = TempDir::new().unwrap();
        assert!(init_project(tmp.path(), "my game").is_err());
        assert!(!tmp.path().join(MANIFEST_NAME).exists());
    }

    #[test]
    fn test_validate_package_name() {
        assert!(validate_package_name("sdl_game-2").is_ok());
        assert!(validate_package_name("").is_err());
        assert!(validate_package_name("-game").is_err());
        assert!(validate_package_name(".hidden").is_err());
        assert!(validate_package_name("my@game").is_err());
    }

    #[test]
    fn test_default_package_name() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("space_rogue");
        std::fs::create_dir(&dir).unwrap();
        assert_eq!(default_package_name(&dir), "space_rogue");
    }
}
