// src/config.rs

//! Project and package configuration files.
//!
//! Two YAML formats live here:
//!
//! - **`picket.yml`** at the project root ([`ProjectConfig`]): the
//!   dependency-constraint table keyed by source tag, plus exclusion
//!   patterns for the checker. One per project; discovered by walking
//!   parent directories.
//! - **`package.yml`** inside each package directory ([`PackageConfig`]):
//!   the package's tag set and optional strict flag. Existence checks also
//!   accept the `package.yaml` spelling.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tag::Tag;

/// Project configuration file name, searched for in parent directories.
pub const CONFIG_FILE_NAME: &str = "picket.yml";

/// Package metadata file name as written by picket.
pub const PACKAGE_FILE_NAME: &str = "package.yml";

/// Alternative package metadata spelling, accepted but never written.
pub const PACKAGE_FILE_NAME_ALT: &str = "package.yaml";

/// Python package marker file.
pub const INIT_FILE_NAME: &str = "__init__.py";

/// Dependency permissions for one source tag.
///
/// `depends_on` is a `BTreeSet` so persisted rules are always sorted and
/// free of duplicates regardless of how many violation records contributed
/// a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDependencyRules {
    #[serde(default)]
    pub depends_on: BTreeSet<Tag>,
}

/// The `picket.yml` project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Constraint table: source tag -> tags it may depend on.
    #[serde(default)]
    pub constraints: BTreeMap<Tag, ScopeDependencyRules>,
    /// Path patterns the checker skips, relative to the project root.
    /// Each pattern matches as a literal prefix or as a glob.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ProjectConfig {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save to a YAML file, replacing any previous content.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|e| Error::ConfigSerialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, content).map_err(|e| Error::ConfigWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// The tags `source` may depend on, if a rule exists for it.
    pub fn depends_on(&self, source: &Tag) -> Option<&BTreeSet<Tag>> {
        self.constraints.get(source).map(|rules| &rules.depends_on)
    }

    /// Grow the rule for `source` by `additions`, creating it if absent.
    pub fn extend_depends_on(&mut self, source: Tag, additions: impl IntoIterator<Item = Tag>) {
        self.constraints
            .entry(source)
            .or_default()
            .depends_on
            .extend(additions);
    }
}

/// The `package.yml` metadata inside a package directory.
///
/// `strict` is read by the checker but never written by the materializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub strict: bool,
}

impl PackageConfig {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Path of the project configuration under `root`.
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// The package metadata file inside `dir`, if either spelling exists.
pub fn package_file_in(dir: &Path) -> Option<PathBuf> {
    for name in [PACKAGE_FILE_NAME, PACKAGE_FILE_NAME_ALT] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Find the project root by walking parent directories from `path` until a
/// directory containing `picket.yml` is found.
///
/// `path` must exist; files start the walk from their containing directory.
pub fn find_project_root(path: &Path) -> Result<PathBuf> {
    let canonical = path.canonicalize()?;
    let mut dir = if canonical.is_dir() {
        canonical
    } else {
        match canonical.parent() {
            Some(parent) => parent.to_path_buf(),
            None => {
                return Err(Error::RootNotFound {
                    path: path.to_path_buf(),
                })
            }
        }
    };

    loop {
        if dir.join(CONFIG_FILE_NAME).is_file() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(Error::RootNotFound {
                path: path.to_path_buf(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_project_config_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);

        let mut config = ProjectConfig::default();
        config.extend_depends_on(Tag::new("a.b"), [Tag::new("c"), Tag::new("b")]);
        config.extend_depends_on(Tag::new("a.b"), [Tag::new("c")]);
        config.exclude.push("tests/".to_string());
        config.save(&path).unwrap();

        let loaded = ProjectConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        let rule: Vec<&str> = loaded
            .depends_on(&Tag::new("a.b"))
            .unwrap()
            .iter()
            .map(Tag::as_str)
            .collect();
        assert_eq!(rule, vec!["b", "c"]);
    }

    #[test]
    fn test_project_config_missing_fields_default() {
        let config: ProjectConfig = serde_yaml::from_str("constraints: {}\n").unwrap();
        assert!(config.constraints.is_empty());
        assert!(config.exclude.is_empty());

        let config: ProjectConfig = serde_yaml::from_str("exclude: [vendored/]\n").unwrap();
        assert_eq!(config.exclude, vec!["vendored/".to_string()]);
    }

    #[test]
    fn test_project_config_load_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join(CONFIG_FILE_NAME);
        assert!(matches!(
            ProjectConfig::load(&missing),
            Err(Error::ConfigRead { .. })
        ));

        fs::write(&missing, "constraints: [not, a, map]\n").unwrap();
        assert!(matches!(
            ProjectConfig::load(&missing),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_package_config_accepts_flow_style_tags() {
        let config: PackageConfig = serde_yaml::from_str("tags: [\"a.b\"]\n").unwrap();
        assert!(config.tags.contains("a.b"));
        assert!(!config.strict);

        let config: PackageConfig =
            serde_yaml::from_str("tags: [\"core\"]\nstrict: true\n").unwrap();
        assert!(config.strict);
    }

    #[test]
    fn test_package_file_in_accepts_both_spellings() {
        let tmp = TempDir::new().unwrap();
        assert!(package_file_in(tmp.path()).is_none());

        fs::write(tmp.path().join(PACKAGE_FILE_NAME_ALT), "tags: []\n").unwrap();
        let found = package_file_in(tmp.path()).unwrap();
        assert!(found.ends_with(PACKAGE_FILE_NAME_ALT));

        fs::write(tmp.path().join(PACKAGE_FILE_NAME), "tags: []\n").unwrap();
        let found = package_file_in(tmp.path()).unwrap();
        assert!(found.ends_with(PACKAGE_FILE_NAME));
    }

    #[test]
    fn test_find_project_root_walks_parents() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), "constraints: {}\n").unwrap();

        let found = find_project_root(&nested).unwrap();
        assert_eq!(found, root.canonicalize().unwrap());
    }

    #[test]
    fn test_find_project_root_missing_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a");
        fs::create_dir_all(&nested).unwrap();

        assert!(matches!(
            find_project_root(&nested),
            Err(Error::RootNotFound { .. })
        ));
    }
}
