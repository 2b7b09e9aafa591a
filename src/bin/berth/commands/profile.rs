//! `berth profile` command

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::ProfileCommandArgs;
use crate::commands::{project_config, select_profile};
use berth::util::GlobalContext;

pub fn execute(args: ProfileCommandArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;

    // Project config comes from the nearest manifest's directory, if any.
    let root = ctx
        .find_manifest()
        .ok()
        .and_then(|path| path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| ctx.cwd().to_path_buf());
    let config = project_config(&ctx, &root)?;
    let profile = select_profile(&config, &args.profile)?;

    if args.json {
        let json = serde_json::to_string_pretty(&profile).context("failed to serialize profile")?;
        println!("{}", json);
    } else {
        println!("os={}", profile.os);
        println!("compiler={}", profile.compiler);
        println!("build_type={}", profile.build_type);
        println!("arch={}", profile.arch);
    }

    Ok(())
}
