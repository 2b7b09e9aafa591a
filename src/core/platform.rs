//! Platform profile - the settings a build is resolved against.
//!
//! A [`PlatformProfile`] is the (os, compiler, build type, arch) tuple that
//! every conditional rule reads. It is detected from the host and then
//! overlaid with config, profile-file and command-line overrides.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::BuildError;
use crate::util::fs::read_to_string;

/// A setting value that is not one of the known names.
#[derive(Debug, Clone, Error)]
#[error("invalid {setting} `{value}` (expected one of: {})", expected.join(", "))]
pub struct ParseSettingError {
    pub setting: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Os {
    Windows,
    Linux,
    Macos,
    FreeBsd,
    Android,
    Ios,
}

impl Os {
    const NAMES: &'static [&'static str] =
        &["Windows", "Linux", "Macos", "FreeBSD", "Android", "iOS"];

    /// The OS this binary was compiled for.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Os::Windows,
            "macos" => Os::Macos,
            "freebsd" => Os::FreeBsd,
            "android" => Os::Android,
            "ios" => Os::Ios,
            _ => Os::Linux,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::Macos => "Macos",
            Os::FreeBsd => "FreeBSD",
            Os::Android => "Android",
            Os::Ios => "iOS",
        }
    }

    /// Filename patterns of runtime shared libraries on this OS.
    pub fn shared_library_patterns(&self) -> &'static [&'static str] {
        match self {
            Os::Windows => &["*.dll"],
            Os::Macos | Os::Ios => &["*.dylib"],
            Os::Linux | Os::FreeBsd | Os::Android => &["*.so", "*.so.*"],
        }
    }

    /// Value for `CMAKE_SYSTEM_NAME`.
    pub fn cmake_system_name(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::Macos => "Darwin",
            Os::FreeBsd => "FreeBSD",
            Os::Android => "Android",
            Os::Ios => "iOS",
        }
    }
}

impl FromStr for Os {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win64" => Ok(Os::Windows),
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" | "osx" => Ok(Os::Macos),
            "freebsd" => Ok(Os::FreeBsd),
            "android" => Ok(Os::Android),
            "ios" => Ok(Os::Ios),
            _ => Err(ParseSettingError {
                setting: "os",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl Compiler {
    const NAMES: &'static [&'static str] = &["gcc", "clang", "apple-clang", "msvc"];

    /// Guess the host compiler from `CC` and the executables on `PATH`.
    pub fn detect(os: Os) -> Self {
        if let Ok(cc) = std::env::var("CC") {
            let stem = Path::new(&cc)
                .file_stem()
                .map(|s| s.to_string_lossy().to_ascii_lowercase())
                .unwrap_or_default();
            if stem.contains("clang") {
                return if os == Os::Macos {
                    Compiler::AppleClang
                } else {
                    Compiler::Clang
                };
            }
            if stem == "cl" {
                return Compiler::Msvc;
            }
            if stem.contains("gcc") || stem == "cc" {
                return Compiler::Gcc;
            }
        }

        match os {
            Os::Windows if which::which("cl").is_ok() => Compiler::Msvc,
            Os::Macos | Os::Ios => Compiler::AppleClang,
            _ if which::which("gcc").is_ok() => Compiler::Gcc,
            _ if which::which("clang").is_ok() => Compiler::Clang,
            Os::Windows => Compiler::Msvc,
            _ => Compiler::Gcc,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Compiler::Gcc => "gcc",
            Compiler::Clang => "clang",
            Compiler::AppleClang => "apple-clang",
            Compiler::Msvc => "msvc",
        }
    }

    /// The usual compiler for an OS.
    pub fn default_for(os: Os) -> Self {
        match os {
            Os::Windows => Compiler::Msvc,
            Os::Macos | Os::Ios => Compiler::AppleClang,
            Os::Android => Compiler::Clang,
            Os::Linux | Os::FreeBsd => Compiler::Gcc,
        }
    }

    /// Whether the usual CMake generator for this compiler holds every
    /// build type in one build tree (Visual Studio).
    pub fn is_multi_config(&self) -> bool {
        matches!(self, Compiler::Msvc)
    }

    /// C and C++ compiler executables.
    pub fn executables(&self) -> (&'static str, &'static str) {
        match self {
            Compiler::Gcc => ("gcc", "g++"),
            Compiler::Clang | Compiler::AppleClang => ("clang", "clang++"),
            Compiler::Msvc => ("cl", "cl"),
        }
    }
}

impl FromStr for Compiler {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcc" | "gnu" => Ok(Compiler::Gcc),
            "clang" | "llvm" => Ok(Compiler::Clang),
            "apple-clang" | "appleclang" => Ok(Compiler::AppleClang),
            "msvc" | "visual studio" | "cl" => Ok(Compiler::Msvc),
            _ => Err(ParseSettingError {
                setting: "compiler",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    const NAMES: &'static [&'static str] = &["Debug", "Release", "RelWithDebInfo", "MinSizeRel"];

    pub const fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, BuildType::Debug)
    }
}

impl FromStr for BuildType {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(ParseSettingError {
                setting: "build type",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Arch {
    X86,
    X86_64,
    Armv7,
    Armv8,
}

impl Arch {
    const NAMES: &'static [&'static str] = &["x86", "x86_64", "armv7", "armv8"];

    /// The architecture this binary was compiled for.
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Arch::X86,
            "aarch64" => Arch::Armv8,
            "arm" => Arch::Armv7,
            _ => Arch::X86_64,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7",
            Arch::Armv8 => "armv8",
        }
    }

    /// Value for `CMAKE_SYSTEM_PROCESSOR`.
    pub fn cmake_processor(&self) -> &'static str {
        match self {
            Arch::X86 => "i686",
            Arch::X86_64 => "x86_64",
            Arch::Armv7 => "armv7-a",
            Arch::Armv8 => "aarch64",
        }
    }
}

impl FromStr for Arch {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" => Ok(Arch::X86),
            "x86_64" | "x64" | "amd64" => Ok(Arch::X86_64),
            "armv7" | "arm" => Ok(Arch::Armv7),
            "armv8" | "aarch64" | "arm64" => Ok(Arch::Armv8),
            _ => Err(ParseSettingError {
                setting: "arch",
                value: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

// String conversions backing the serde `try_from`/`into` attributes.
macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = ParseSettingError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

string_conversions!(Os, Compiler, BuildType, Arch);

/// The platform a build is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub os: Os,
    pub compiler: Compiler,
    pub build_type: BuildType,
    pub arch: Arch,
}

impl PlatformProfile {
    pub fn new(os: Os, compiler: Compiler, build_type: BuildType, arch: Arch) -> Self {
        PlatformProfile {
            os,
            compiler,
            build_type,
            arch,
        }
    }

    /// Detect the host platform. Build type defaults to Release.
    pub fn host() -> Self {
        Self::from_overrides(&ProfileOverrides::default())
    }

    /// Build a profile from overrides, filling unset settings from the host.
    ///
    /// When the OS differs from the host the compiler is not probed; the
    /// target OS's usual compiler is used instead.
    pub fn from_overrides(overrides: &ProfileOverrides) -> Self {
        let os = overrides.os.unwrap_or_else(Os::host);
        let compiler = overrides.compiler.unwrap_or_else(|| {
            if os == Os::host() {
                Compiler::detect(os)
            } else {
                Compiler::default_for(os)
            }
        });
        PlatformProfile {
            os,
            compiler,
            build_type: overrides.build_type.unwrap_or_default(),
            arch: overrides.arch.unwrap_or_else(Arch::host),
        }
    }

    /// Return a copy with every set override applied.
    pub fn with_overrides(mut self, overrides: &ProfileOverrides) -> Self {
        if let Some(os) = overrides.os {
            self.os = os;
        }
        if let Some(compiler) = overrides.compiler {
            self.compiler = compiler;
        }
        if let Some(build_type) = overrides.build_type {
            self.build_type = build_type;
        }
        if let Some(arch) = overrides.arch {
            self.arch = arch;
        }
        self
    }
}

impl fmt::Display for PlatformProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.os, self.arch, self.compiler, self.build_type
        )
    }
}

/// Partial profile settings, as found in config files, profile files and
/// command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverrides {
    pub os: Option<Os>,
    pub compiler: Option<Compiler>,
    pub build_type: Option<BuildType>,
    pub arch: Option<Arch>,
}

impl ProfileOverrides {
    /// Merge another set of overrides into this one (other takes precedence).
    pub fn merge(&mut self, other: &ProfileOverrides) {
        if other.os.is_some() {
            self.os = other.os;
        }
        if other.compiler.is_some() {
            self.compiler = other.compiler;
        }
        if other.build_type.is_some() {
            self.build_type = other.build_type;
        }
        if other.arch.is_some() {
            self.arch = other.arch;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.os.is_none()
            && self.compiler.is_none()
            && self.build_type.is_none()
            && self.arch.is_none()
    }
}

#[derive(Deserialize)]
struct ProfileFile {
    #[serde(default)]
    settings: ProfileOverrides,
}

/// Load a profile file. Settings live under a `[settings]` table:
///
/// ```toml
/// [settings]
/// os = "Windows"
/// compiler = "msvc"
/// build_type = "Release"
/// arch = "x86_64"
/// ```
pub fn load_profile_file(path: &Path) -> Result<ProfileOverrides, BuildError> {
    let contents = read_to_string(path)?;
    let file: ProfileFile = toml::from_str(&contents)
        .map_err(|e| BuildError::invalid_toml("profile", path, &contents, &e))?;
    Ok(file.settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_settings_case_insensitive() {
        assert_eq!("Windows".parse::<Os>().unwrap(), Os::Windows);
        assert_eq!("windows".parse::<Os>().unwrap(), Os::Windows);
        assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("apple-clang".parse::<Compiler>().unwrap(), Compiler::AppleClang);
        assert_eq!("release".parse::<BuildType>().unwrap(), BuildType::Release);
        assert_eq!("x64".parse::<Arch>().unwrap(), Arch::X86_64);
        assert_eq!("arm64".parse::<Arch>().unwrap(), Arch::Armv8);
    }

    #[test]
    fn test_from_overrides_cross_os_uses_default_compiler() {
        let target = if Os::host() == Os::Windows { Os::Linux } else { Os::Windows };
        let overrides = ProfileOverrides {
            os: Some(target),
            build_type: Some(BuildType::Debug),
            ..Default::default()
        };
        let profile = PlatformProfile::from_overrides(&overrides);
        assert_eq!(profile.os, target);
        assert_eq!(profile.compiler, Compiler::default_for(target));
        assert_eq!(profile.build_type, BuildType::Debug);
        assert_eq!(profile.arch, Arch::host());
    }

    #[test]
    fn test_parse_setting_error_lists_choices() {
        let err = "plan9".parse::<Os>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid os `plan9`"));
        assert!(msg.contains("Windows"));
    }

    #[test]
    fn test_shared_library_patterns() {
        assert_eq!(Os::Windows.shared_library_patterns(), &["*.dll"]);
        assert_eq!(Os::Macos.shared_library_patterns(), &["*.dylib"]);
        assert!(Os::Linux.shared_library_patterns().contains(&"*.so"));
    }

    #[test]
    fn test_overrides_apply_only_set_fields() {
        let base = PlatformProfile::new(Os::Linux, Compiler::Gcc, BuildType::Release, Arch::X86_64);
        let overrides = ProfileOverrides {
            os: Some(Os::Windows),
            compiler: Some(Compiler::Msvc),
            ..Default::default()
        };

        let profile = base.with_overrides(&overrides);
        assert_eq!(profile.os, Os::Windows);
        assert_eq!(profile.compiler, Compiler::Msvc);
        assert_eq!(profile.build_type, BuildType::Release);
        assert_eq!(profile.arch, Arch::X86_64);
    }

    #[test]
    fn test_overrides_merge() {
        let mut base = ProfileOverrides {
            os: Some(Os::Linux),
            build_type: Some(BuildType::Debug),
            ..Default::default()
        };
        base.merge(&ProfileOverrides {
            os: Some(Os::Windows),
            ..Default::default()
        });

        assert_eq!(base.os, Some(Os::Windows));
        assert_eq!(base.build_type, Some(BuildType::Debug));
    }

    #[test]
    fn test_load_profile_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("windows.toml");
        std::fs::write(
            &path,
            r#"
[settings]
os = "Windows"
compiler = "msvc"
build_type = "Release"
arch = "x86_64"
"#,
        )
        .unwrap();

        let settings = load_profile_file(&path).unwrap();
        assert_eq!(settings.os, Some(Os::Windows));
        assert_eq!(settings.compiler, Some(Compiler::Msvc));
        assert_eq!(settings.arch, Some(Arch::X86_64));
    }

    #[test]
    fn test_load_profile_file_rejects_unknown_os() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        std::fs::write(&path, "[settings]\nos = \"beos\"\n").unwrap();

        let err = load_profile_file(&path).unwrap_err();
        assert!(matches!(err, BuildError::Configuration { .. }));
    }

    #[test]
    fn test_profile_display() {
        let profile = PlatformProfile::new(Os::Windows, Compiler::Msvc, BuildType::Release, Arch::X86_64);
        assert_eq!(profile.to_string(), "Windows-x86_64-msvc-Release");
    }
}
