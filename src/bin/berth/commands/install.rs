//! `berth install` command

use anyhow::Result;

use crate::cli::InstallArgs;
use crate::commands::{manifest_path, project_config, select_profile};
use berth::core::Workspace;
use berth::ops::{install, InstallOptions};
use berth::sources::LocalStore;
use berth::util::diagnostic::{emit, suggestions, Diagnostic};
use berth::util::GlobalContext;

pub fn execute(args: InstallArgs, color: bool) -> Result<()> {
    let ctx = GlobalContext::new()?;

    let manifest_path = manifest_path(&ctx, args.manifest_path)?;
    let mut ws = Workspace::new(&manifest_path)?;

    let config = project_config(&ctx, ws.root())?;
    let profile = select_profile(&config, &args.profile)?;

    // Output folder: CLI > config > default
    if let Some(dir) = args.output_folder.or_else(|| config.toolchain.build_dir.clone()) {
        ws = ws.with_build_root(dir);
    }

    // Store: CLI/env > config > ~/.berth/store
    let store_dir = args
        .store
        .or_else(|| config.store.path.clone())
        .unwrap_or_else(|| ctx.store_dir());
    let mut store = LocalStore::new(store_dir);
    if !store.root().is_dir() {
        let warning = Diagnostic::warning(format!(
            "package store `{}` does not exist",
            store.root().display()
        ))
        .with_suggestion(suggestions::NO_STORE);
        emit(&warning, color);
    }

    let opts = InstallOptions {
        user_presets: args.user_presets || config.user_presets(),
    };

    let result = install(&ws, &profile, &mut store, &opts)?;

    for staged in &result.staged {
        for file in &staged.files {
            eprintln!("      Staged {} ({})", file, staged.dependency);
        }
    }
    eprintln!(
        "    Finished {} dependencies for {}, {} runtime file(s) in {}",
        result.dependencies.len(),
        profile,
        result.staged_file_count(),
        result.layout.build_folder.display()
    );

    Ok(())
}
