//! Command implementations

pub mod completions;
pub mod init;
pub mod install;
pub mod profile;
pub mod requirements;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use berth::core::platform::{load_profile_file, PlatformProfile};
use berth::util::config::{load_config, Config};
use berth::util::diagnostic::suggestions;
use berth::util::GlobalContext;

use crate::cli::ProfileArgs;

/// Locate the manifest: an explicit path, or an upward search from cwd.
pub fn manifest_path(ctx: &GlobalContext, explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(ctx.cwd().join(path)),
        None => ctx
            .find_manifest()
            .map_err(|e| anyhow!("{}\n\nhelp: {}", e, suggestions::NO_MANIFEST)),
    }
}

/// Global config merged with the project's `.berth/config.toml`.
pub fn project_config(ctx: &GlobalContext, project_root: &Path) -> Result<Config> {
    Ok(load_config(
        &ctx.config_path(),
        &ctx.project_config_path(project_root),
    )?)
}

/// Host defaults, then config, then the profile file, then flags.
pub fn select_profile(config: &Config, args: &ProfileArgs) -> Result<PlatformProfile> {
    let mut overrides = config.profile;

    if let Some(path) = &args.profile_file {
        overrides.merge(&load_profile_file(path)?);
    }
    overrides.merge(&args.overrides());

    Ok(PlatformProfile::from_overrides(&overrides))
}
