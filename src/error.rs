// src/error.rs

//! Crate-wide error type for picket operations.
//!
//! Validation failures abort an invocation before any filesystem mutation;
//! configuration and I/O failures are fatal wherever they occur. The
//! residual-violation warning after constraint synthesis is *not* an error
//! and is returned as data (see [`crate::add::AddReport`]).

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by picket operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The candidate path does not exist on disk.
    #[error("{} does not exist", .path.display())]
    PathMissing { path: PathBuf },

    /// The candidate directory already carries a package metadata file.
    #[error("{} already contains a package.yml", .path.display())]
    AlreadyPackage { path: PathBuf },

    /// The candidate directory is not a Python package.
    #[error("{} is not a valid Python package (no __init__.py found)", .path.display())]
    NotAPackage { path: PathBuf },

    /// The candidate file cannot be pivoted because it is not Python source.
    #[error("{} is not a Python file", .path.display())]
    NotAPythonFile { path: PathBuf },

    /// The pivot destination directory already exists.
    #[error("{} already has a directory of the same name", .path.display())]
    PivotCollision { path: PathBuf },

    /// No project configuration was found walking up from the path.
    #[error("picket.yml does not exist in any parent directory of {}", .path.display())]
    RootNotFound { path: PathBuf },

    /// A configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A configuration could not be serialized for writing.
    #[error("failed to serialize {}: {source}", .path.display())]
    ConfigSerialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A configuration file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure during pivot or metadata emission.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for picket operations.
pub type Result<T> = std::result::Result<T, Error>;
