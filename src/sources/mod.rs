//! Dependency engines.
//!
//! Berth does not fetch or build packages itself. It submits requirements
//! to a [`DependencyEngine`] and reads back the resolved packages.

pub mod engine;
pub mod store;

pub use engine::DependencyEngine;
pub use store::LocalStore;
