//! Core data structures for Berth.
//!
//! This module contains the foundational types used throughout Berth:
//! - Platform profiles and their settings
//! - Requirement declarations and resolved dependencies
//! - Manifests, workspaces and build layouts

pub mod layout;
pub mod manifest;
pub mod platform;
pub mod requirement;
pub mod workspace;

pub use layout::Layout;
pub use manifest::Manifest;
pub use platform::{Arch, BuildType, Compiler, Os, PlatformProfile, ProfileOverrides};
pub use requirement::{OptionValue, Requirement, ResolvedDependency};
pub use workspace::{find_manifest, Workspace, MANIFEST_NAME};
