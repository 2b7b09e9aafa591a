//! CMake package config generator.
//!
//! One `<name>-config.cmake` per resolved dependency, so that
//! `find_package(<name> CONFIG)` finds an imported `<name>::<name>` target.

use std::path::{Path, PathBuf};

use anyhow::Result;
use glob::Pattern;

use crate::builder::{GenerateContext, Generator};
use crate::core::platform::Os;
use crate::core::requirement::ResolvedDependency;
use crate::util::fs::{cmake_path, matching_files, write_string};

/// CMake package config generator.
#[derive(Debug, Clone, Default)]
pub struct CMakeDeps;

impl CMakeDeps {
    pub fn new() -> Self {
        CMakeDeps
    }

    /// Config file name for a dependency.
    pub fn config_file_name(dep: &ResolvedDependency) -> String {
        format!("{}-config.cmake", dep.name)
    }

    /// Render the config file for one dependency.
    pub fn render(&self, dep: &ResolvedDependency, os: Os) -> Result<String> {
        let target = format!("{0}::{0}", dep.name);
        let libraries = link_libraries(&dep.lib_dirs, os)?;

        let mut out = String::new();
        out.push_str(&format!("# Generated by berth for {}\n\n", dep.coordinate()));
        out.push_str(&format!("if(NOT TARGET {})\n", target));
        out.push_str(&format!("  add_library({} INTERFACE IMPORTED)\n", target));
        out.push_str(&format!("  set_target_properties({} PROPERTIES\n", target));
        out.push_str(&format!(
            "    INTERFACE_INCLUDE_DIRECTORIES \"{}\"\n",
            join_paths(&dep.include_dirs)
        ));
        out.push_str(&format!(
            "    INTERFACE_LINK_DIRECTORIES \"{}\"\n",
            join_paths(&dep.lib_dirs)
        ));
        out.push_str(&format!(
            "    INTERFACE_LINK_LIBRARIES \"{}\"\n",
            join_paths(&libraries)
        ));
        out.push_str("  )\n");
        out.push_str("endif()\n\n");
        out.push_str(&format!("set({}_FOUND TRUE)\n", dep.name));
        out.push_str(&format!("set({}_VERSION \"{}\")\n", dep.name, dep.version));
        Ok(out)
    }
}

impl Generator for CMakeDeps {
    fn name(&self) -> &str {
        "CMakeDeps"
    }

    fn generate(&self, ctx: &GenerateContext<'_>) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(ctx.dependencies.len());

        for dep in ctx.dependencies {
            let path = ctx
                .layout
                .generators_folder
                .join(Self::config_file_name(dep));
            write_string(&path, &self.render(dep, ctx.profile.os)?)?;
            tracing::debug!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}

/// Link-time libraries directly inside the lib dirs.
fn link_libraries(lib_dirs: &[PathBuf], os: Os) -> Result<Vec<PathBuf>> {
    let globs: &[&str] = match os {
        Os::Windows => &["*.lib"],
        Os::Macos | Os::Ios => &["*.a", "*.dylib"],
        _ => &["*.a", "*.so"],
    };
    let patterns: Vec<Pattern> = globs.iter().filter_map(|g| Pattern::new(g).ok()).collect();

    let mut libraries = Vec::new();
    for dir in lib_dirs.iter().filter(|d| d.is_dir()) {
        libraries.extend(matching_files(dir, &patterns)?);
    }
    Ok(libraries)
}

fn join_paths(paths: &[impl AsRef<Path>]) -> String {
    paths
        .iter()
        .map(|p| cmake_path(p.as_ref()))
        .collect::<Vec<_>>()
        .join(";")
}
