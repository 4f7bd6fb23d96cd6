// src/check/mod.rs

//! Boundary checking: does every import respect the declared constraints?
//!
//! [`BoundaryCheck`] is the seam the constraint synthesizer consumes, so
//! tests can script checker outcomes. The shipped implementation is
//! [`ImportChecker`]: it indexes every package under the project root,
//! scans each Python file for imports, and reports a [`Violation`] for
//! every import a source tag is not permitted to make.
//!
//! Checking never mutates the tree or the configuration; results are
//! deterministic for a fixed filesystem state.

pub mod imports;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{PackageConfig, ProjectConfig, package_file_in};
use crate::error::Result;
use crate::filesystem;
use crate::tag::Tag;

use imports::PyImport;

/// One disallowed import, as reported by a checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Root-relative path of the importing file.
    pub file: PathBuf,
    /// Dotted module path of the import target.
    pub import_path: String,
    /// Tag of the importing package this record is attributed to.
    pub source_tag: Tag,
    /// Target tags the source tag may not depend on. Empty for
    /// message-class records.
    pub invalid_tags: BTreeSet<Tag>,
    /// Explanation for records the constraint synthesizer cannot repair,
    /// such as strict-interface breaches.
    pub message: Option<String>,
}

impl Violation {
    /// True when this is a tag violation the synthesizer can repair by
    /// extending `depends_on`.
    pub fn is_tag_error(&self) -> bool {
        !self.invalid_tags.is_empty()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            write!(f, "{}: {}", self.file.display(), message)
        } else {
            let invalid: Vec<&str> = self.invalid_tags.iter().map(Tag::as_str).collect();
            write!(
                f,
                "{}: cannot import '{}': tag '{}' does not depend on '{}'",
                self.file.display(),
                self.import_path,
                self.source_tag,
                invalid.join("', '"),
            )
        }
    }
}

/// Capability to check a project tree against a configuration snapshot.
pub trait BoundaryCheck {
    /// Report every violation in the tree under `root`, given the
    /// constraint table in `project_config` and the exclusion patterns.
    fn check(
        &self,
        root: &Path,
        project_config: &ProjectConfig,
        exclude_paths: &[String],
    ) -> Result<Vec<Violation>>;
}

/// Index of the packages and Python modules under a project root.
struct PackageIndex {
    /// Package configuration keyed by dotted module path.
    packages: BTreeMap<String, PackageConfig>,
    /// Every Python module under the root, for from-import resolution.
    modules: BTreeSet<String>,
}

impl PackageIndex {
    fn build(root: &Path, exclude: &[String]) -> Result<Self> {
        let mut packages = BTreeMap::new();
        for rel in filesystem::walk_packages(root, exclude) {
            let Some(file) = package_file_in(&root.join(&rel)) else {
                continue;
            };
            packages.insert(filesystem::module_path(&rel), PackageConfig::load(&file)?);
        }

        let mut modules = BTreeSet::new();
        for rel in filesystem::walk_pyfiles(root, exclude) {
            modules.insert(filesystem::module_path(&rel));
        }

        Ok(Self { packages, modules })
    }

    fn has_module(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    /// The owning package of `module`: the longest indexed package path
    /// that is a dot-prefix of it.
    fn nearest_package(&self, module: &str) -> Option<(&str, &PackageConfig)> {
        self.packages
            .iter()
            .filter(|(pkg, _)| is_dot_prefix(pkg, module))
            .max_by_key(|(pkg, _)| pkg.len())
            .map(|(pkg, config)| (pkg.as_str(), config))
    }
}

fn is_dot_prefix(prefix: &str, module: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    if !module.starts_with(prefix) {
        return false;
    }
    module.len() == prefix.len() || module.as_bytes()[prefix.len()] == b'.'
}

/// The shipped import checker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportChecker;

impl ImportChecker {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the scanned imports of one file to dotted target modules.
    ///
    /// `from X import name` resolves to the module `X.name` when one
    /// exists, else to `X` itself; `from X import *` depends on `X`.
    fn resolve_targets(&self, imports: Vec<PyImport>, index: &PackageIndex) -> BTreeSet<String> {
        let mut targets = BTreeSet::new();
        for import in imports {
            match import {
                PyImport::Module(module) => {
                    targets.insert(module);
                }
                PyImport::From { module, names } => {
                    for name in names {
                        if name == "*" {
                            if !module.is_empty() {
                                targets.insert(module.clone());
                            }
                            continue;
                        }
                        let candidate = if module.is_empty() {
                            name
                        } else {
                            format!("{module}.{name}")
                        };
                        if index.has_module(&candidate) {
                            targets.insert(candidate);
                        } else if !module.is_empty() {
                            targets.insert(module.clone());
                        }
                    }
                }
            }
        }
        targets
    }
}

impl BoundaryCheck for ImportChecker {
    fn check(
        &self,
        root: &Path,
        project_config: &ProjectConfig,
        exclude_paths: &[String],
    ) -> Result<Vec<Violation>> {
        let index = PackageIndex::build(root, exclude_paths)?;
        debug!(
            "indexed {} packages, {} modules under {}",
            index.packages.len(),
            index.modules.len(),
            root.display()
        );

        let mut violations = Vec::new();

        for rel in filesystem::walk_pyfiles(root, exclude_paths) {
            let module = filesystem::module_path(&rel);
            let Some((source_pkg, source_config)) = index.nearest_package(&module) else {
                continue;
            };
            let source_tags = &source_config.tags;
            let Some(lead_tag) = source_tags.first() else {
                continue;
            };

            let is_init = rel.file_name().is_some_and(|name| name == "__init__.py");
            let content = filesystem::read_file_content(&root.join(&rel))?;
            let targets = self.resolve_targets(imports::scan_imports(&content, &module, is_init), &index);

            for target in targets {
                let Some((target_pkg, target_config)) = index.nearest_package(&target) else {
                    continue;
                };
                if target_pkg == source_pkg {
                    continue;
                }

                if target_config.strict && target != target_pkg {
                    violations.push(Violation {
                        file: rel.clone(),
                        import_path: target.clone(),
                        source_tag: lead_tag.clone(),
                        invalid_tags: BTreeSet::new(),
                        message: Some(format!(
                            "import '{target}' reaches inside strict package '{target_pkg}', \
                             import through '{target_pkg}' instead"
                        )),
                    });
                }

                // An import is valid for a source tag when every target tag
                // is the source tag itself or a declared dependency.
                for source_tag in source_tags {
                    let depends = project_config.depends_on(source_tag);
                    let invalid: BTreeSet<Tag> = target_config
                        .tags
                        .iter()
                        .filter(|t| *t != source_tag && !depends.is_some_and(|d| d.contains(*t)))
                        .cloned()
                        .collect();
                    if !invalid.is_empty() {
                        violations.push(Violation {
                            file: rel.clone(),
                            import_path: target.clone(),
                            source_tag: source_tag.clone(),
                            invalid_tags: invalid,
                            message: None,
                        });
                    }
                }
            }
        }

        Ok(violations)
    }
}
