// src/cli.rs
//! CLI definitions for the picket boundary checker
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "picket")]
#[command(author = "Picket Project")]
#[command(version)]
#[command(about = "A module boundary checker for Python codebases", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert source paths into tagged packages and infer their dependencies
    Add {
        /// Files or directories to convert into packages
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Tag to apply to every new package (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Check that imports respect the declared package boundaries
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
