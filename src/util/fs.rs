//! Filesystem utilities.
//!
//! Every helper reports failures as [`BuildError::Filesystem`] with the
//! offending path attached.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::errors::BuildError;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|e| BuildError::filesystem("create directory", path, e))
}

/// Read a file to string.
pub fn read_to_string(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|e| BuildError::filesystem("read file", path, e))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|e| BuildError::filesystem("write file", path, e))
}

/// Copy a file, replacing the destination.
///
/// `fs::copy` carries the source's permission bits over, so a read-only
/// source leaves a read-only copy. The old destination is removed first
/// so that copying again still succeeds.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, BuildError> {
    match fs::remove_file(dst) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(BuildError::filesystem("replace", dst, e)),
    }
    fs::copy(src, dst).map_err(|e| BuildError::filesystem("copy into", dst, e))
}

/// List the regular files directly inside `dir` whose file name matches any
/// of the glob `patterns`. Sorted by path; does not recurse.
pub fn matching_files(dir: &Path, patterns: &[Pattern]) -> Result<Vec<PathBuf>, BuildError> {
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let entries = fs::read_dir(dir).map_err(|e| BuildError::filesystem("read directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BuildError::filesystem("read directory", dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if patterns.iter().any(|p| p.matches_with(&name, options)) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Render a path with forward slashes, as CMake expects.
pub fn cmake_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patterns(globs: &[&str]) -> Vec<Pattern> {
        globs.iter().map(|g| Pattern::new(g).unwrap()).collect()
    }

    #[test]
    fn test_matching_files_filters_by_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("SDL2.dll"), "dll").unwrap();
        fs::write(tmp.path().join("zlib.DLL"), "dll").unwrap();
        fs::write(tmp.path().join("readme.txt"), "text").unwrap();
        fs::create_dir(tmp.path().join("nested.dll")).unwrap();

        let files = matching_files(tmp.path(), &patterns(&["*.dll"])).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["SDL2.dll", "zlib.DLL"]);
    }

    #[test]
    fn test_matching_files_versioned_so() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("libfoo.so"), "").unwrap();
        fs::write(tmp.path().join("libfoo.so.1.2"), "").unwrap();
        fs::write(tmp.path().join("libfoo.a"), "").unwrap();

        let files = matching_files(tmp.path(), &patterns(&["*.so", "*.so.*"])).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_matching_files_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let err = matching_files(&tmp.path().join("nope"), &patterns(&["*.dll"])).unwrap_err();
        assert!(matches!(err, BuildError::Filesystem { .. }));
    }

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.txt");
        write_string(&path, "content").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_cmake_path() {
        assert_eq!(cmake_path(Path::new("C:\\deps\\sdl")), "C:/deps/sdl");
    }
}
