// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a project root containing an empty `picket.yml`.
///
/// Returns the TempDir - keep it alive to prevent cleanup.
pub fn setup_project() -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("picket.yml"), "constraints: {}\n").unwrap();
    temp_dir
}

/// Create a Python package directory: an `__init__.py` plus a `package.yml`
/// carrying the given tags.
pub fn write_package(root: &Path, rel: &str, tags: &[&str]) -> PathBuf {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("__init__.py"), "").unwrap();
    let quoted: Vec<String> = tags.iter().map(|t| format!("\"{}\"", t)).collect();
    fs::write(
        dir.join("package.yml"),
        format!("tags: [{}]\n", quoted.join(",")),
    )
    .unwrap();
    dir
}

/// Create a plain Python source file, along with any missing parents.
pub fn write_module(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
