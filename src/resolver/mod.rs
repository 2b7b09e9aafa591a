//! Requirement resolution.
//!
//! Resolution is a pure function of the platform profile and the base
//! requirement set: the base entries come first, untouched and in order,
//! followed by the requirements of every matching platform rule. Rules are
//! evaluated in table order and contribute their requirements in the order
//! they list them.
//!
//! Nothing here validates coordinates or detects duplicates; that is the
//! dependency engine's job when the requirements are submitted.

pub mod errors;
pub mod rules;

use crate::core::platform::PlatformProfile;
use crate::core::requirement::Requirement;

pub use errors::ResolveError;
pub use rules::{default_rules, PlatformCondition, PlatformRule};

/// Resolve the requirements for a profile using the built-in rule table.
pub fn resolve_requirements(profile: &PlatformProfile, base: &[Requirement]) -> Vec<Requirement> {
    resolve_with_rules(profile, base, &default_rules())
}

/// Resolve the requirements for a profile against an explicit rule table.
pub fn resolve_with_rules(
    profile: &PlatformProfile,
    base: &[Requirement],
    rules: &[PlatformRule],
) -> Vec<Requirement> {
    let mut resolved = base.to_vec();

    for rule in rules {
        if rule.condition.matches(profile) {
            tracing::debug!(
                "platform rule matched {}: adding {} requirement(s)",
                profile,
                rule.requirements.len()
            );
            resolved.extend(rule.requirements.iter().cloned());
        }
    }

    resolved
}
