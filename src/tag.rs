// src/tag.rs

//! Boundary tags identifying logical package scopes.
//!
//! A tag is an opaque string label attached to a package through its
//! metadata file. Tags are deliberately not unique: one package may carry
//! several tags, and several packages may share a tag to form a single
//! logical scope whose members import each other freely.
//!
//! # Canonical derivation
//!
//! When a package is materialized without explicit tags, its tag is derived
//! from the path relative to the project root: the `.py` suffix is stripped
//! and path separators become dots.
//!
//! Examples:
//! - `a/b/foo.py` -> `a.b.foo`
//! - `./billing` -> `billing`

use std::borrow::Borrow;
use std::convert::Infallible;
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque label identifying a logical package scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Create a tag from any string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Derive the canonical tag for a package path.
    ///
    /// Drops `.` and root components, joins the rest with dots, and strips
    /// a trailing `.py`: `a/b/foo.py` -> `a.b.foo`.
    pub fn from_path(path: &Path) -> Self {
        let components: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();
        let dotted = components.join(".");
        match dotted.strip_suffix(".py") {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(dotted),
        }
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Tag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}
