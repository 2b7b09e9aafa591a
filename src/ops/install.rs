//! Implementation of `berth install`.
//!
//! Runs the whole pipeline for one platform profile: resolve the
//! requirement list, hand it to the dependency engine, write the build
//! system configuration, then stage runtime libraries into the build
//! folder.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::{CMakeDeps, CMakeToolchain, GenerateContext, Generator};
use crate::core::layout::Layout;
use crate::core::platform::PlatformProfile;
use crate::core::requirement::{Requirement, ResolvedDependency};
use crate::core::Workspace;
use crate::ops::stage::{stage_runtime_artifacts, StagedArtifact};
use crate::resolver::resolve_requirements;
use crate::sources::DependencyEngine;

/// Options for the install command.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Write `CMakeUserPresets.json` at the project root
    pub user_presets: bool,
}

/// What an install did.
#[derive(Debug, Clone)]
pub struct InstallResult {
    /// Requirement list submitted to the engine, in order
    pub requirements: Vec<Requirement>,

    /// Dependencies as resolved by the engine
    pub dependencies: Vec<ResolvedDependency>,

    /// Files written by the generators
    pub generated: Vec<PathBuf>,

    /// Runtime libraries copied into the build folder
    pub staged: Vec<StagedArtifact>,

    /// Layout used
    pub layout: Layout,
}

impl InstallResult {
    /// Total number of staged files.
    pub fn staged_file_count(&self) -> usize {
        self.staged.iter().map(|s| s.files.len()).sum()
    }
}

/// Install dependencies for `ws` on `profile`.
pub fn install(
    ws: &Workspace,
    profile: &PlatformProfile,
    engine: &mut dyn DependencyEngine,
    opts: &InstallOptions,
) -> Result<InstallResult> {
    tracing::info!("Installing {} for {}", ws.manifest().name(), profile);

    let requirements = resolve_requirements(profile, ws.manifest().requirements());
    tracing::debug!("{} requirement(s) after platform rules", requirements.len());

    tracing::info!("Resolving {} requirement(s) with {}", requirements.len(), engine.name());
    for requirement in &requirements {
        engine.require(requirement)?;
    }
    let dependencies = engine.dependencies().to_vec();

    let layout = ws.layout(profile);
    let ctx = GenerateContext {
        profile,
        layout: &layout,
        dependencies: &dependencies,
    };

    let generators: Vec<Box<dyn Generator>> = vec![
        Box::new(CMakeToolchain::new(opts.user_presets)),
        Box::new(CMakeDeps::new()),
    ];

    let mut generated = Vec::new();
    for generator in &generators {
        let files = generator.generate(&ctx)?;
        tracing::info!("{} wrote {} file(s)", generator.name(), files.len());
        generated.extend(files);
    }

    let staged = stage_runtime_artifacts(&dependencies, &layout.build_folder, profile.os)?;

    Ok(InstallResult {
        requirements,
        dependencies,
        generated,
        staged,
        layout,
    })
}
