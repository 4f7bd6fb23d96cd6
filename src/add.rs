// src/add.rs

//! Convert source locations into tagged packages and auto-infer the
//! dependency constraints their existing imports need.
//!
//! One `add` invocation composes four steps: validate every candidate path
//! up front (a single bad path aborts before any mutation), materialize
//! each path into a package, then run the checker twice around a single
//! constraint-table rewrite so the new packages' existing imports stop
//! flagging. Whatever the rewrite cannot resolve is reported as a warning,
//! never retried; the checker runs exactly twice.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::check::BoundaryCheck;
use crate::config::{self, PackageConfig, ProjectConfig};
use crate::error::{Error, Result};
use crate::tag::Tag;

const INIT_CONTENT_TEMPLATE: &str = "# Generated by picket on {timestamp}\nfrom .main import *\n";

/// File a pivoted module is renamed to inside its new package.
const PIVOT_FILE_NAME: &str = "main.py";

/// Warning returned when the second check still reports violations.
pub const RESIDUAL_WARNING: &str =
    "Could not auto-detect all dependencies, use 'picket check' to finish initialization manually.";

/// Outcome of a successful `add` invocation.
///
/// The CLI prints these in order: advisories, created packages, then the
/// residual warning if constraint synthesis left violations behind.
#[derive(Debug, Default)]
pub struct AddReport {
    /// Non-fatal notes produced while validating the candidate paths.
    pub advisories: Vec<String>,
    /// Package directories that were created or tagged, as supplied.
    pub created: Vec<PathBuf>,
    /// Tags derived from paths for packages given no explicit tags.
    pub new_tags: BTreeSet<Tag>,
    /// Set when constraint synthesis could not resolve every violation.
    pub warning: Option<String>,
}

fn build_init_content() -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    INIT_CONTENT_TEMPLATE.replace("{timestamp}", &timestamp.to_string())
}

/// The directory a path materializes into: the path itself for
/// directories, the path minus its `.py` suffix for files.
fn pivot_dir_for(path: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_suffix(".py")) {
        Some(stripped) => PathBuf::from(stripped),
        None => path.to_path_buf(),
    }
}

/// Check that `path` is eligible for conversion into a package.
///
/// Returns advisory notes for conditions the caller should surface but
/// which do not block the conversion. Performs no filesystem mutation.
pub fn validate_path(path: &Path) -> Result<Vec<String>> {
    let mut advisories = Vec::new();

    if !path.exists() {
        return Err(Error::PathMissing {
            path: path.to_path_buf(),
        });
    }

    if path.is_dir() {
        // A directory must be a Python package that is not yet declared.
        if config::package_file_in(path).is_some() {
            return Err(Error::AlreadyPackage {
                path: path.to_path_buf(),
            });
        }
        if !path.join(config::INIT_FILE_NAME).is_file() {
            return Err(Error::NotAPackage {
                path: path.to_path_buf(),
            });
        }
    } else {
        // A file must be Python source we can pivot into a package.
        if path.extension().and_then(|ext| ext.to_str()) != Some("py") {
            return Err(Error::NotAPythonFile {
                path: path.to_path_buf(),
            });
        }
        if pivot_dir_for(path).exists() {
            return Err(Error::PivotCollision {
                path: path.to_path_buf(),
            });
        }
        advisories.push(format!(
            "'{}' will be moved into a new package. \
             You may need to update relative imports within this file.",
            path.display()
        ));
        if let Some(parent) = path.parent()
            && let Some(package_file) = config::package_file_in(parent)
        {
            let package_config = PackageConfig::load(&package_file)?;
            if package_config.strict {
                // Pivoting out of a strict package cuts the file off from
                // its former siblings; that repair is on the user.
                advisories.push(format!(
                    "'{}' is contained by a strict package. You may need to update \
                     imports from '{}' to come through __all__ in __init__.py",
                    path.display(),
                    parent.display()
                ));
            }
        }
    }

    config::find_project_root(path)?;
    Ok(advisories)
}

/// Materialize `path` into a declared package.
///
/// Directories get a `package.yml`; files are pivoted first: a directory
/// is created at the path minus `.py`, the file moves inside as `main.py`,
/// and a generated `__init__.py` re-exports it. With an empty `tags` set
/// the package is tagged with its canonical tag (the pivot directory's
/// path relative to `root`, dotted), which is returned so the caller
/// learns which tag is new. `root` must be the canonicalized project root.
pub fn build_package(root: &Path, path: &Path, tags: &BTreeSet<Tag>) -> Result<Option<Tag>> {
    let canonical = path.canonicalize()?;
    let rel = canonical.strip_prefix(root).unwrap_or(&canonical);
    let new_tag = Tag::from_path(rel);

    let package_dir = pivot_dir_for(path);
    if path.is_file() {
        fs::create_dir(&package_dir)?;
        fs::write(package_dir.join(config::INIT_FILE_NAME), build_init_content())?;
        fs::rename(path, package_dir.join(PIVOT_FILE_NAME))?;
        info!(
            "pivoted {} into package {}",
            path.display(),
            package_dir.display()
        );
    }

    let tags_to_write: Vec<&Tag> = if tags.is_empty() {
        vec![&new_tag]
    } else {
        tags.iter().collect()
    };
    let quoted: Vec<String> = tags_to_write.iter().map(|tag| format!("\"{tag}\"")).collect();
    let content = format!("tags: [{}]\n", quoted.join(","));
    fs::write(package_dir.join(config::PACKAGE_FILE_NAME), content)?;

    Ok(tags.is_empty().then_some(new_tag))
}

/// Rewrite the constraint table so the violations involving `tags` are
/// resolved, persist it, and report whether violations remain.
///
/// The checker runs exactly twice: once to collect violations against the
/// loaded configuration, once to verify the rewritten one. Qualifying
/// invalid-tag sets are unioned per source tag before any rule is written,
/// so the outcome does not depend on the order of the checker's records.
pub fn synthesize_constraints(
    root: &Path,
    checker: &dyn BoundaryCheck,
    tags: &BTreeSet<Tag>,
) -> Result<Option<String>> {
    let config_path = config::project_config_path(root);
    let mut project_config = ProjectConfig::load(&config_path)?;

    let violations = checker.check(root, &project_config, &project_config.exclude)?;
    debug!("first check reported {} violations", violations.len());

    let mut additions: BTreeMap<Tag, BTreeSet<Tag>> = BTreeMap::new();
    for violation in violations.iter().filter(|v| v.is_tag_error()) {
        if tags.contains(&violation.source_tag) {
            // A newly introduced tag learns all of its invalid imports.
            additions
                .entry(violation.source_tag.clone())
                .or_default()
                .extend(violation.invalid_tags.iter().cloned());
        }
        let overlap: BTreeSet<Tag> = violation.invalid_tags.intersection(tags).cloned().collect();
        if !overlap.is_empty() {
            // An existing tag learns only the newly introduced targets.
            additions
                .entry(violation.source_tag.clone())
                .or_default()
                .extend(overlap);
        }
    }

    for (source, invalid) in additions {
        debug!("extending depends_on for '{source}' with {} tag(s)", invalid.len());
        project_config.extend_depends_on(source, invalid);
    }
    project_config.save(&config_path)?;

    let residue = checker.check(root, &project_config, &project_config.exclude)?;
    if residue.is_empty() {
        Ok(None)
    } else {
        info!(
            "{} violation(s) remain after constraint synthesis",
            residue.len()
        );
        Ok(Some(RESIDUAL_WARNING.to_string()))
    }
}

/// Convert `paths` into tagged packages and auto-infer their constraints.
///
/// Every path is validated before anything is materialized, so one bad
/// path aborts the invocation with no side effects. Duplicate paths are
/// converted once. With explicit `tags` every package gets that tag set
/// and synthesis resolves around those tags; otherwise each package gets
/// its canonical tag and synthesis resolves around the new tags.
pub fn add_packages(
    paths: &[PathBuf],
    tags: &BTreeSet<Tag>,
    checker: &dyn BoundaryCheck,
) -> Result<AddReport> {
    let mut report = AddReport::default();

    let mut unique: Vec<&Path> = Vec::new();
    for path in paths {
        if !unique.contains(&path.as_path()) {
            unique.push(path.as_path());
        }
    }

    for path in &unique {
        report.advisories.extend(validate_path(path)?);
    }

    let Some(first) = unique.first() else {
        return Ok(report);
    };
    // Resolved before any pivot: a pivoted file path no longer exists.
    let root = config::find_project_root(first)?;

    for path in &unique {
        if let Some(new_tag) = build_package(&root, path, tags)? {
            report.new_tags.insert(new_tag);
        }
        report.created.push(pivot_dir_for(path));
    }

    let synth_tags = if tags.is_empty() {
        report.new_tags.clone()
    } else {
        tags.clone()
    };
    report.warning = synthesize_constraints(&root, checker, &synth_tags)?;

    info!("added {} package(s)", report.created.len());
    Ok(report)
}
