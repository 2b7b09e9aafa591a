//! Berth - declarative dependency setup for native C/C++ applications
//!
//! This crate provides the core library functionality for Berth: platform
//! dependent requirement resolution, CMake toolchain generation and staging
//! of runtime shared libraries next to the application binary.

pub mod builder;
pub mod core;
pub mod errors;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

pub use crate::core::{
    manifest::Manifest, platform::PlatformProfile, requirement::Requirement,
    requirement::ResolvedDependency, workspace::Workspace,
};

pub use errors::BuildError;
pub use resolver::resolve_requirements;
pub use util::context::GlobalContext;
