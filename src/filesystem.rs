// src/filesystem.rs

//! Filesystem traversal for the boundary checker.
//!
//! All walks are rooted at the project root and yield root-relative paths in
//! sorted order, so checker output is deterministic for a fixed tree. Hidden
//! directories and `__pycache__` are always pruned; user-supplied exclusion
//! patterns from `picket.yml` are applied on top.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::config::package_file_in;
use crate::error::Result;

/// Read a file to a string, surfacing the underlying I/O error.
pub fn read_file_content(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Does `rel_path` match any exclusion pattern?
///
/// A pattern matches as a literal prefix of the relative path or, when it
/// compiles, as a glob. Invalid globs fall back to prefix matching only.
pub fn is_excluded(rel_path: &Path, exclude: &[String]) -> bool {
    let rel = rel_path.to_string_lossy();
    exclude.iter().any(|pattern| {
        if rel.starts_with(pattern.as_str()) {
            return true;
        }
        if let Ok(compiled) = Pattern::new(pattern)
            && compiled.matches(&rel)
        {
            return true;
        }
        false
    })
}

fn is_pruned(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "__pycache__"
}

/// Collect every Python source file under `root`, as sorted root-relative
/// paths, skipping excluded subtrees.
pub fn walk_pyfiles(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_pruned(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("py") {
            continue;
        }
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        if is_excluded(rel, exclude) {
            continue;
        }
        files.push(rel.to_path_buf());
    }

    files.sort();
    files
}

/// Collect every package directory under `root` (a directory carrying a
/// `package.yml` or `package.yaml`), as sorted root-relative paths.
pub fn walk_packages(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    let mut packages = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_pruned(e))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if package_file_in(path).is_none() {
            continue;
        }
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        if entry.depth() > 0 && is_excluded(rel, exclude) {
            continue;
        }
        packages.push(rel.to_path_buf());
    }

    packages.sort();
    packages
}

/// Dotted module path of a root-relative Python file.
///
/// `a/b/foo.py` -> `a.b.foo`; a package initializer `a/b/__init__.py` is the
/// package module itself, `a.b`.
pub fn module_path(rel_path: &Path) -> String {
    let mut parts: Vec<&str> = rel_path
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    match parts.last().copied() {
        Some("__init__.py") => {
            parts.pop();
        }
        Some(last) => {
            if let Some(stem) = last.strip_suffix(".py") {
                parts.pop();
                parts.push(stem);
            }
        }
        None => {}
    }

    parts.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_walk_pyfiles_sorted_and_pruned() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b/mod.py"));
        touch(&tmp.path().join("a/mod.py"));
        touch(&tmp.path().join("a/notes.txt"));
        touch(&tmp.path().join(".git/hook.py"));
        touch(&tmp.path().join("a/__pycache__/mod.cpython-312.py"));

        let files = walk_pyfiles(tmp.path(), &[]);
        assert_eq!(
            files,
            vec![PathBuf::from("a/mod.py"), PathBuf::from("b/mod.py")]
        );
    }

    #[test]
    fn test_walk_pyfiles_honors_exclude_patterns() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("core/mod.py"));
        touch(&tmp.path().join("vendored/dep.py"));
        touch(&tmp.path().join("tests/test_mod.py"));

        let exclude = vec!["vendored/".to_string(), "tests/*".to_string()];
        let files = walk_pyfiles(tmp.path(), &exclude);
        assert_eq!(files, vec![PathBuf::from("core/mod.py")]);
    }

    #[test]
    fn test_walk_packages_finds_both_spellings() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a/package.yml"));
        touch(&tmp.path().join("b/c/package.yaml"));
        touch(&tmp.path().join("plain/mod.py"));

        let packages = walk_packages(tmp.path(), &[]);
        assert_eq!(packages, vec![PathBuf::from("a"), PathBuf::from("b/c")]);
    }

    #[test]
    fn test_is_excluded_prefix_and_glob() {
        let exclude = vec!["vendored/".to_string(), "*/generated".to_string()];
        assert!(is_excluded(Path::new("vendored/dep.py"), &exclude));
        assert!(is_excluded(Path::new("api/generated"), &exclude));
        assert!(!is_excluded(Path::new("core/mod.py"), &exclude));
        assert!(!is_excluded(Path::new("core/mod.py"), &[]));
    }

    #[test]
    fn test_module_path() {
        assert_eq!(module_path(Path::new("a/b/foo.py")), "a.b.foo");
        assert_eq!(module_path(Path::new("a/b/__init__.py")), "a.b");
        assert_eq!(module_path(Path::new("foo.py")), "foo");
        assert_eq!(module_path(Path::new("__init__.py")), "");
    }
}
