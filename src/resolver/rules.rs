//! Platform-conditional requirement rules.

use crate::core::platform::{Arch, BuildType, Compiler, Os, PlatformProfile};
use crate::core::requirement::Requirement;

/// Platform condition for a rule. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformCondition {
    pub os: Option<Os>,
    pub compiler: Option<Compiler>,
    pub build_type: Option<BuildType>,
    pub arch: Option<Arch>,
}

impl PlatformCondition {
    /// A condition on the operating system alone.
    pub fn os(os: Os) -> Self {
        PlatformCondition {
            os: Some(os),
            ..Default::default()
        }
    }

    /// Check if this condition matches the given profile.
    pub fn matches(&self, profile: &PlatformProfile) -> bool {
        if let Some(os) = self.os {
            if os != profile.os {
                return false;
            }
        }
        if let Some(compiler) = self.compiler {
            if compiler != profile.compiler {
                return false;
            }
        }
        if let Some(build_type) = self.build_type {
            if build_type != profile.build_type {
                return false;
            }
        }
        if let Some(arch) = self.arch {
            if arch != profile.arch {
                return false;
            }
        }
        true
    }
}

/// Requirements appended when a condition matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRule {
    pub condition: PlatformCondition,
    pub requirements: Vec<Requirement>,
}

impl PlatformRule {
    pub fn new(condition: PlatformCondition, requirements: Vec<Requirement>) -> Self {
        PlatformRule {
            condition,
            requirements,
        }
    }
}

/// The built-in rule table.
///
/// On Windows the SDL stack is not available from the system, so the text
/// rendering, media and image decoding libraries are pulled in as shared
/// builds and their DLLs staged next to the executable.
pub fn default_rules() -> Vec<PlatformRule> {
    vec![PlatformRule::new(
        PlatformCondition::os(Os::Windows),
        vec![
            Requirement::new("sdl_ttf/2.22.0").shared(),
            Requirement::new("sdl/2.28.3").shared(),
            Requirement::new("sdl_image/2.6.3").shared(),
        ],
    )]
}
