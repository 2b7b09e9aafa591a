//! DependencyEngine trait - the interface berth needs from a package manager.

use crate::core::requirement::{Requirement, ResolvedDependency};
use crate::errors::BuildError;

/// Something that turns requirement declarations into built packages.
pub trait DependencyEngine {
    /// Get the engine name for display.
    fn name(&self) -> &str;

    /// Register one requirement. Requirements are submitted in resolution
    /// order; the engine decides whether it can satisfy each one.
    fn require(&mut self, requirement: &Requirement) -> Result<(), BuildError>;

    /// The resolved dependencies, in the engine's iteration order.
    fn dependencies(&self) -> &[ResolvedDependency];
}
