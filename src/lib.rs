// src/lib.rs

//! Picket
//!
//! A module boundary checker for Python codebases. Source trees declare
//! packages by dropping a `package.yml` next to their `__init__.py`, and a
//! project-level `picket.yml` records which tags may depend on which.
//! Picket walks the tree, parses imports, and flags any import that crosses
//! a package boundary without a declared dependency.
//!
//! # Architecture
//!
//! - Config-first: package metadata in `package.yml`, constraints in `picket.yml`
//! - Tags: dotted identifiers, shared by any number of packages
//! - Checker: a pure pass over the tree plus config, swappable behind a trait
//! - Add: converts plain source paths into packages and infers their constraints

pub mod add;
pub mod check;
pub mod config;
mod error;
pub mod filesystem;
pub mod tag;

pub use add::{add_packages, AddReport};
pub use check::{BoundaryCheck, ImportChecker, Violation};
pub use config::{PackageConfig, ProjectConfig};
pub use error::{Error, Result};
pub use tag::Tag;
