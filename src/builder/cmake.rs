//! CMake toolchain generator.
//!
//! Writes `berth_toolchain.cmake` and `CMakePresets.json` into the
//! generators folder, and optionally a `CMakeUserPresets.json` at the
//! project root that includes them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

use crate::builder::{GenerateContext, Generator};
use crate::core::platform::{Compiler, Os, PlatformProfile};
use crate::util::fs::{cmake_path, relative_path, write_string};

/// Toolchain file name.
pub const TOOLCHAIN_FILE: &str = "berth_toolchain.cmake";

/// Presets file written next to the toolchain file.
pub const PRESETS_FILE: &str = "CMakePresets.json";

/// Presets file written at the project root.
pub const USER_PRESETS_FILE: &str = "CMakeUserPresets.json";

/// CMake toolchain generator.
#[derive(Debug, Clone, Default)]
pub struct CMakeToolchain {
    /// Write `CMakeUserPresets.json` at the project root
    pub user_presets: bool,
}

impl CMakeToolchain {
    pub fn new(user_presets: bool) -> Self {
        CMakeToolchain { user_presets }
    }

    /// Render the toolchain file.
    pub fn render_toolchain(&self, profile: &PlatformProfile, generators_folder: &Path) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Generated by berth for {}\n\n", profile));

        if profile.os != Os::host() {
            out.push_str(&format!(
                "set(CMAKE_SYSTEM_NAME {})\n",
                profile.os.cmake_system_name()
            ));
        }
        out.push_str(&format!(
            "set(CMAKE_SYSTEM_PROCESSOR {})\n",
            profile.arch.cmake_processor()
        ));

        let (cc, cxx) = profile.compiler.executables();
        out.push_str(&format!("set(CMAKE_C_COMPILER \"{}\")\n", cc));
        out.push_str(&format!("set(CMAKE_CXX_COMPILER \"{}\")\n", cxx));

        if !profile.compiler.is_multi_config() {
            out.push_str(&format!(
                "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"Build type\" FORCE)\n",
                profile.build_type
            ));
        }

        if profile.compiler == Compiler::Msvc {
            let runtime = if profile.build_type.is_debug() {
                "MultiThreadedDebugDLL"
            } else {
                "MultiThreadedDLL"
            };
            out.push_str("cmake_policy(SET CMP0091 NEW)\n");
            out.push_str(&format!("set(CMAKE_MSVC_RUNTIME_LIBRARY \"{}\")\n", runtime));
        }

        let generators = cmake_path(generators_folder);
        out.push('\n');
        out.push_str(&format!("list(PREPEND CMAKE_PREFIX_PATH \"{}\")\n", generators));
        out.push_str(&format!("list(PREPEND CMAKE_MODULE_PATH \"{}\")\n", generators));
        out
    }

    /// Render `CMakePresets.json`.
    pub fn render_presets(&self, ctx: &GenerateContext<'_>) -> Result<String> {
        let profile = ctx.profile;
        let name = preset_name(profile);
        let toolchain = ctx.layout.generators_folder.join(TOOLCHAIN_FILE);

        let mut configure = json!({
            "name": name,
            "displayName": format!("berth {}", profile),
            "binaryDir": cmake_path(&ctx.layout.build_folder),
            "toolchainFile": cmake_path(&toolchain),
        });
        let mut build = json!({
            "name": name,
            "configurePreset": name,
        });

        if profile.compiler.is_multi_config() {
            build["configuration"] = json!(profile.build_type.as_str());
        } else {
            configure["cacheVariables"] = json!({
                "CMAKE_BUILD_TYPE": profile.build_type.as_str(),
            });
        }

        let presets = json!({
            "version": 3,
            "configurePresets": [configure],
            "buildPresets": [build],
        });
        serde_json::to_string_pretty(&presets).context("failed to serialize CMake presets")
    }

    /// Render `CMakeUserPresets.json`, including the generated presets file.
    pub fn render_user_presets(&self, ctx: &GenerateContext<'_>) -> Result<String> {
        let presets = ctx.layout.generators_folder.join(PRESETS_FILE);
        let include = relative_path(&ctx.layout.source_folder, &presets);
        let user = json!({
            "version": 4,
            "include": [cmake_path(&include)],
        });
        serde_json::to_string_pretty(&user).context("failed to serialize CMake user presets")
    }
}

impl Generator for CMakeToolchain {
    fn name(&self) -> &str {
        "CMakeToolchain"
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<PathBuf>> {
        let generators = &ctx.layout.generators_folder;
        let mut written = Vec::new();

        let toolchain_path = generators.join(TOOLCHAIN_FILE);
        write_string(&toolchain_path, &self.render_toolchain(ctx.profile, generators))?;
        written.push(toolchain_path);

        let presets_path = generators.join(PRESETS_FILE);
        write_string(&presets_path, &self.render_presets(ctx)?)?;
        written.push(presets_path);

        if self.user_presets {
            let user_path = ctx.layout.source_folder.join(USER_PRESETS_FILE);
            write_string(&user_path, &self.render_user_presets(ctx)?)?;
            written.push(user_path);
        } else {
            tracing::debug!("Skipping {}", USER_PRESETS_FILE);
        }

        Ok(written)
    }
}

fn preset_name(profile: &PlatformProfile) -> String {
    format!("berth-{}", profile.build_type.as_str().to_ascii_lowercase())
}
