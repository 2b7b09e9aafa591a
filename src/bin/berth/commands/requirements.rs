//! `berth requirements` command
//!
//! Prints the requirement list berth would submit for a profile, without
//! touching the package store.

use anyhow::{Context, Result};

use crate::cli::RequirementsArgs;
use crate::commands::{manifest_path, project_config, select_profile};
use berth::core::Workspace;
use berth::resolve_requirements;
use berth::util::GlobalContext;

pub fn execute(args: RequirementsArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let manifest_path = manifest_path(&ctx, args.manifest_path)?;
    let ws = Workspace::new(&manifest_path)?;

    let config = project_config(&ctx, ws.root())?;
    let profile = select_profile(&config, &args.profile)?;

    let requirements = resolve_requirements(&profile, ws.manifest().requirements());

    if args.json {
        let json = serde_json::to_string_pretty(&requirements)
            .context("failed to serialize requirements")?;
        println!("{}", json);
    } else {
        for requirement in &requirements {
            println!("{}", requirement);
        }
    }

    Ok(())
}
