// tests/add_flow.rs

//! End-to-end tests for converting source paths into tagged packages.

mod common;

use picket::add::{add_packages, RESIDUAL_WARNING};
use picket::check::ImportChecker;
use picket::config::{project_config_path, ProjectConfig};
use picket::Tag;
use std::collections::BTreeSet;
use std::fs;

#[test]
fn test_add_directory_infers_constraints() {
    let temp_dir = common::setup_project();
    let root = temp_dir.path();

    common::write_package(root, "core", &["core"]);
    common::write_module(root, "core/logic.py", "");
    common::write_package(root, "utils", &["utils"]);
    common::write_module(
        root,
        "billing/__init__.py",
        "from core import logic\nimport utils\n",
    );

    let billing = root.join("billing");
    let checker = ImportChecker::new();
    let report = add_packages(&[billing.clone()], &BTreeSet::new(), &checker).unwrap();

    // The directory became a package tagged after its module path
    assert_eq!(report.created, vec![billing.clone()]);
    assert_eq!(report.new_tags, BTreeSet::from([Tag::new("billing")]));
    let package_file = fs::read_to_string(billing.join("package.yml")).unwrap();
    assert_eq!(package_file, "tags: [\"billing\"]\n");

    // Both imports were learned as constraints, so nothing is left over
    assert!(report.warning.is_none());
    let config = ProjectConfig::load(&project_config_path(root)).unwrap();
    let deps = config.depends_on(&Tag::new("billing")).unwrap();
    assert_eq!(deps, &BTreeSet::from([Tag::new("core"), Tag::new("utils")]));
}

#[test]
fn test_add_file_pivots_and_infers() {
    let temp_dir = common::setup_project();
    let root = temp_dir.path();

    common::write_package(root, "core", &["core"]);
    common::write_module(root, "core/logic.py", "");
    let source = "from core import logic\n\nTOTAL = 1\n";
    common::write_module(root, "reports.py", source);

    let checker = ImportChecker::new();
    let report = add_packages(&[root.join("reports.py")], &BTreeSet::new(), &checker).unwrap();

    // The file was pivoted into a package directory of the same name
    assert!(!root.join("reports.py").exists());
    let moved = fs::read_to_string(root.join("reports/main.py")).unwrap();
    assert_eq!(moved, source);
    let init = fs::read_to_string(root.join("reports/__init__.py")).unwrap();
    assert!(init.starts_with("# Generated by picket on "));
    assert!(init.ends_with("from .main import *\n"));
    let package_file = fs::read_to_string(root.join("reports/package.yml")).unwrap();
    assert_eq!(package_file, "tags: [\"reports\"]\n");

    // The pivot advisory was surfaced and the import was learned
    assert_eq!(report.advisories.len(), 1);
    assert!(report.advisories[0].contains("will be moved into a new package"));
    assert!(report.warning.is_none());
    let config = ProjectConfig::load(&project_config_path(root)).unwrap();
    let deps = config.depends_on(&Tag::new("reports")).unwrap();
    assert_eq!(deps, &BTreeSet::from([Tag::new("core")]));
}

#[test]
fn test_add_grants_existing_packages_access_to_new_one() {
    let temp_dir = common::setup_project();
    let root = temp_dir.path();

    common::write_package(root, "api", &["api"]);
    common::write_module(root, "api/__init__.py", "import web\n");
    common::write_module(root, "web/__init__.py", "");

    let checker = ImportChecker::new();
    let report = add_packages(&[root.join("web")], &BTreeSet::new(), &checker).unwrap();

    // The existing package now depends on the freshly tagged one
    assert!(report.warning.is_none());
    let config = ProjectConfig::load(&project_config_path(root)).unwrap();
    let deps = config.depends_on(&Tag::new("api")).unwrap();
    assert_eq!(deps, &BTreeSet::from([Tag::new("web")]));
    assert!(config.depends_on(&Tag::new("web")).is_none());
}

#[test]
fn test_add_reports_unrelated_violations_as_residual() {
    let temp_dir = common::setup_project();
    let root = temp_dir.path();

    common::write_package(root, "api", &["api"]);
    common::write_module(root, "api/__init__.py", "import db\n");
    common::write_package(root, "db", &["db"]);
    common::write_module(root, "web/__init__.py", "");

    let checker = ImportChecker::new();
    let report = add_packages(&[root.join("web")], &BTreeSet::new(), &checker).unwrap();

    // The new package was still materialized
    let package_file = fs::read_to_string(root.join("web/package.yml")).unwrap();
    assert_eq!(package_file, "tags: [\"web\"]\n");

    // The api -> db violation does not involve the added tag, so it is
    // reported instead of repaired
    assert_eq!(report.warning.as_deref(), Some(RESIDUAL_WARNING));
    let config = ProjectConfig::load(&project_config_path(root)).unwrap();
    assert!(config.depends_on(&Tag::new("api")).is_none());
}

#[test]
fn test_add_with_explicit_tags_threads_to_constraints() {
    let temp_dir = common::setup_project();
    let root = temp_dir.path();

    common::write_package(root, "core", &["core"]);
    common::write_module(root, "billing/__init__.py", "import core\n");

    let tags = BTreeSet::from([Tag::new("service")]);
    let checker = ImportChecker::new();
    let report = add_packages(&[root.join("billing")], &tags, &checker).unwrap();

    // Explicit tags replace the derived one everywhere
    assert!(report.new_tags.is_empty());
    let package_file = fs::read_to_string(root.join("billing/package.yml")).unwrap();
    assert_eq!(package_file, "tags: [\"service\"]\n");

    assert!(report.warning.is_none());
    let config = ProjectConfig::load(&project_config_path(root)).unwrap();
    let deps = config.depends_on(&Tag::new("service")).unwrap();
    assert_eq!(deps, &BTreeSet::from([Tag::new("core")]));
    assert!(config.depends_on(&Tag::new("billing")).is_none());
}
