//! Build directory layout.
//!
//! Follows the usual CMake convention: multi-config generators (Visual
//! Studio) share one build tree for every build type, single-config
//! generators get one tree per build type.
//!
//! ```text
//! multi-config:  <root>/build/              <root>/build/generators/
//! single-config: <root>/build/Release/      <root>/build/Release/generators/
//! ```

use std::path::{Path, PathBuf};

use crate::core::platform::PlatformProfile;

/// Default name of the build folder, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Where sources, build outputs and generated files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Project source root
    pub source_folder: PathBuf,

    /// Where the build system writes the application binary; runtime
    /// libraries are staged here
    pub build_folder: PathBuf,

    /// Where toolchain and dependency config files are written
    pub generators_folder: PathBuf,
}

impl Layout {
    /// CMake layout rooted at `<project_root>/build`.
    pub fn cmake(project_root: &Path, profile: &PlatformProfile) -> Self {
        Self::cmake_in(project_root, &project_root.join(DEFAULT_BUILD_DIR), profile)
    }

    /// CMake layout with an explicit build root.
    pub fn cmake_in(project_root: &Path, build_root: &Path, profile: &PlatformProfile) -> Self {
        let build_folder = if profile.compiler.is_multi_config() {
            build_root.to_path_buf()
        } else {
            build_root.join(profile.build_type.as_str())
        };

        Layout {
            source_folder: project_root.to_path_buf(),
            generators_folder: build_folder.join("generators"),
            build_folder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{Arch, BuildType, Compiler, Os};

    #[test]
    fn test_single_config_layout() {
        let profile = PlatformProfile::new(Os::Linux, Compiler::Gcc, BuildType::Debug, Arch::X86_64);
        let layout = Layout::cmake(Path::new("/proj"), &profile);

        assert_eq!(layout.source_folder, PathBuf::from("/proj"));
        assert_eq!(layout.build_folder, PathBuf::from("/proj/build/Debug"));
        assert_eq!(
            layout.generators_folder,
            PathBuf::from("/proj/build/Debug/generators")
        );
    }

    #[test]
    fn test_multi_config_layout() {
        let profile =
            PlatformProfile::new(Os::Windows, Compiler::Msvc, BuildType::Release, Arch::X86_64);
        let layout = Layout::cmake(Path::new("/proj"), &profile);

        assert!(profile.compiler.is_multi_config());
        assert_eq!(layout.build_folder, PathBuf::from("/proj/build"));
        assert_eq!(layout.generators_folder, PathBuf::from("/proj/build/generators"));
    }

    #[test]
    fn test_custom_build_root() {
        let profile =
            PlatformProfile::new(Os::Windows, Compiler::Gcc, BuildType::Release, Arch::X86_64);
        let layout = Layout::cmake_in(Path::new("/proj"), Path::new("/out"), &profile);
        assert_eq!(layout.build_folder, PathBuf::from("/out/Release"));
    }
}
