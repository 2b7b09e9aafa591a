//! `berth init` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::InitArgs;
use berth::ops::{default_package_name, init_project};

pub fn execute(args: InitArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));
    let name = args.name.unwrap_or_else(|| default_package_name(&path));

    init_project(&path, &name)?;

    eprintln!("     Initialized `{}` in {}", name, path.display());
    Ok(())
}
