//! Runtime artifact staging.
//!
//! Copies each resolved dependency's runtime shared libraries into the
//! application's build folder so the binary runs without installing
//! anything. Only the first binary directory of a dependency is read.
//! Existing files are overwritten, which makes staging safe to rerun;
//! it is not transactional, so a failure part way leaves earlier copies.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::core::platform::Os;
use crate::core::requirement::ResolvedDependency;
use crate::errors::BuildError;
use crate::util::fs::{copy_file, ensure_dir, matching_files};

/// One copied file group: files in `source` matching `pattern`, copied to
/// `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedArtifact {
    /// Dependency coordinate the files came from
    pub dependency: String,

    /// Binary directory the files were read from
    pub source: PathBuf,

    /// Shared-library filename pattern(s), `;`-separated
    pub pattern: String,

    /// Build folder the files were copied into
    pub destination: PathBuf,

    /// Copied file names
    pub files: Vec<String>,
}

/// Copy the runtime shared libraries of `dependencies` into `destination`.
///
/// Dependencies without a binary directory are skipped without touching
/// the filesystem. When two dependencies ship a file with the same name,
/// the one iterated last wins.
pub fn stage_runtime_artifacts<'a, I>(
    dependencies: I,
    destination: &Path,
    os: Os,
) -> Result<Vec<StagedArtifact>, BuildError>
where
    I: IntoIterator<Item = &'a ResolvedDependency>,
{
    let raw_patterns = os.shared_library_patterns();
    let patterns: Vec<Pattern> = raw_patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();
    let pattern = raw_patterns.join(";");

    let mut staged = Vec::new();
    let mut destination_ready = false;

    for dep in dependencies {
        let Some(bin_dir) = dep.primary_bin_dir() else {
            tracing::debug!("{} has no binary directories, skipping", dep.coordinate());
            continue;
        };

        let files = matching_files(bin_dir, &patterns)?;

        if !destination_ready {
            ensure_dir(destination)?;
            destination_ready = true;
        }

        let mut copied = Vec::with_capacity(files.len());
        for file in &files {
            let Some(name) = file.file_name() else {
                continue;
            };
            let target = destination.join(name);
            copy_file(file, &target)?;
            tracing::debug!("Copied {} -> {}", file.display(), target.display());
            copied.push(name.to_string_lossy().to_string());
        }

        if !copied.is_empty() {
            tracing::info!(
                "Staged {} runtime librar{} from {}",
                copied.len(),
                if copied.len() == 1 { "y" } else { "ies" },
                dep.coordinate()
            );
        }

        staged.push(StagedArtifact {
            dependency: dep.coordinate(),
            source: bin_dir.to_path_buf(),
            pattern: pattern.clone(),
            destination: destination.to_path_buf(),
            files: copied,
        });
    }

    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap())
            .map(|e| {
                (
                    e.file_name().to_string_lossy().to_string(),
                    fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    }

    fn dep_with_bin(tmp: &Path, name: &str, files: &[(&str, &str)]) -> ResolvedDependency {
        let root = tmp.join("store").join(name);
        let bin = root.join("bin");
        fs::create_dir_all(&bin).unwrap();
        for (file, contents) in files {
            fs::write(bin.join(file), contents).unwrap();
        }
        ResolvedDependency::new(name, "1.0", root).with_bin_dir(bin)
    }

    #[test]
    fn test_copies_matching_files_only() {
        let tmp = TempDir::new().unwrap();
        let dep = dep_with_bin(
            tmp.path(),
            "sdl",
            &[("SDL2.dll", "sdl"), ("sdl2-config", "script"), ("SDL2.pdb", "pdb")],
        );
        let out = tmp.path().join("build");

        let staged = stage_runtime_artifacts([&dep], &out, Os::Windows).unwrap();

        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].files, vec!["SDL2.dll"]);
        assert_eq!(staged[0].pattern, "*.dll");
        assert_eq!(
            snapshot(&out).keys().cloned().collect::<Vec<_>>(),
            vec!["SDL2.dll"]
        );
    }

    #[test]
    fn test_skips_dependency_without_bin_dirs() {
        let tmp = TempDir::new().unwrap();
        let header_only = ResolvedDependency::new("fmt", "10.1.1", tmp.path().join("missing"));
        let out = tmp.path().join("build");

        let staged = stage_runtime_artifacts([&header_only], &out, Os::Windows).unwrap();

        assert!(staged.is_empty());
        // No filesystem operations at all: not even the destination is created.
        assert!(!out.exists());
    }

    #[test]
    fn test_reads_only_first_bin_dir() {
        let tmp = TempDir::new().unwrap();
        let second = tmp.path().join("second");
        fs::create_dir_all(&second).unwrap();
        fs::write(second.join("other.dll"), "other").unwrap();

        let dep = dep_with_bin(tmp.path(), "sdl", &[("SDL2.dll", "sdl")]).with_bin_dir(&second);
        let out = tmp.path().join("build");

        stage_runtime_artifacts([&dep], &out, Os::Windows).unwrap();

        let contents = snapshot(&out);
        assert!(contents.contains_key("SDL2.dll"));
        assert!(!contents.contains_key("other.dll"));
    }

    #[test]
    fn test_staging_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let deps = vec![
            dep_with_bin(tmp.path(), "sdl", &[("SDL2.dll", "sdl")]),
            dep_with_bin(tmp.path(), "sdl_ttf", &[("SDL2_ttf.dll", "ttf"), ("freetype.dll", "ft")]),
        ];
        let out = tmp.path().join("build");

        stage_runtime_artifacts(&deps, &out, Os::Windows).unwrap();
        let once = snapshot(&out);
        stage_runtime_artifacts(&deps, &out, Os::Windows).unwrap();
        let twice = snapshot(&out);

        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_overwrites_existing_files() {
        let tmp = TempDir::new().unwrap();
        let dep = dep_with_bin(tmp.path(), "sdl", &[("SDL2.dll", "new")]);
        let out = tmp.path().join("build");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("SDL2.dll"), "old").unwrap();

        stage_runtime_artifacts([&dep], &out, Os::Windows).unwrap();
        assert_eq!(fs::read_to_string(out.join("SDL2.dll")).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_restaging_read_only_library() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dep = dep_with_bin(tmp.path(), "sdl", &[("SDL2.dll", "v1")]);
        let source = tmp.path().join("store").join("sdl").join("bin").join("SDL2.dll");
        fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();
        let out = tmp.path().join("build");

        stage_runtime_artifacts([&dep], &out, Os::Windows).unwrap();
        let staged_mode = fs::metadata(out.join("SDL2.dll")).unwrap().permissions().mode();
        assert_eq!(staged_mode & 0o222, 0);

        fs::set_permissions(&source, fs::Permissions::from_mode(0o644)).unwrap();
        fs::write(&source, "v2").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o444)).unwrap();

        stage_runtime_artifacts([&dep], &out, Os::Windows).unwrap();
        assert_eq!(fs::read_to_string(out.join("SDL2.dll")).unwrap(), "v2");
    }

    #[test]
    fn test_collision_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let a = dep_with_bin(tmp.path(), "a", &[("zlib1.dll", "from a")]);
        let b = dep_with_bin(tmp.path(), "b", &[("zlib1.dll", "from b")]);
        let out = tmp.path().join("build");

        stage_runtime_artifacts([&a, &b], &out, Os::Windows).unwrap();
        assert_eq!(fs::read_to_string(out.join("zlib1.dll")).unwrap(), "from b");
    }

    #[test]
    fn test_pattern_follows_os() {
        let tmp = TempDir::new().unwrap();
        let dep = dep_with_bin(
            tmp.path(),
            "sdl",
            &[("SDL2.dll", ""), ("libSDL2.so", ""), ("libSDL2-2.0.so.0", ""), ("libSDL2.dylib", "")],
        );

        let linux_out = tmp.path().join("linux");
        let staged = stage_runtime_artifacts([&dep], &linux_out, Os::Linux).unwrap();
        assert_eq!(staged[0].files, vec!["libSDL2-2.0.so.0", "libSDL2.so"]);

        let mac_out = tmp.path().join("mac");
        let staged = stage_runtime_artifacts([&dep], &mac_out, Os::Macos).unwrap();
        assert_eq!(staged[0].files, vec!["libSDL2.dylib"]);
    }

    #[test]
    fn test_unreadable_source_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let dep = ResolvedDependency::new("sdl", "2.28.3", tmp.path())
            .with_bin_dir(tmp.path().join("does-not-exist"));

        let err = stage_runtime_artifacts([&dep], &tmp.path().join("build"), Os::Windows)
            .unwrap_err();
        assert!(matches!(err, BuildError::Filesystem { .. }));
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let tmp = TempDir::new().unwrap();
        let dep = dep_with_bin(tmp.path(), "sdl", &[("SDL2.dll", "sdl")]);
        // A regular file where the build folder should be.
        let out = tmp.path().join("build");
        fs::write(&out, "not a directory").unwrap();

        let err = stage_runtime_artifacts([&dep], &out, Os::Windows).unwrap_err();
        assert!(matches!(err, BuildError::Filesystem { .. }));
    }
}
