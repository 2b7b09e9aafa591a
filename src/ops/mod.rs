//! High-level operations.
//!
//! This module contains the implementation of Berth commands.

pub mod berth_init;
pub mod install;
pub mod stage;

pub use berth_init::{default_package_name, init_project};
pub use install::{install, InstallOptions, InstallResult};
pub use stage::{stage_runtime_artifacts, StagedArtifact};
