//! Build system integration.
//!
//! Generators turn a resolved dependency set into configuration files the
//! downstream build system reads. Berth never runs the build itself.

pub mod cmake;
pub mod cmake_deps;

use std::path::PathBuf;

use anyhow::Result;

use crate::core::layout::Layout;
use crate::core::platform::PlatformProfile;
use crate::core::requirement::ResolvedDependency;

pub use cmake::CMakeToolchain;
pub use cmake_deps::CMakeDeps;

/// Everything a generator may look at.
#[derive(Debug, Clone, Copy)]
pub struct GenerateContext<'a> {
    pub profile: &'a PlatformProfile,
    pub layout: &'a Layout,
    pub dependencies: &'a [ResolvedDependency],
}

/// A toolchain or dependency config generator.
pub trait Generator {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Write the generator's files and return their paths.
    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<PathBuf>>;
}
