// src/commands.rs
//! Command handlers for the picket CLI

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use picket::add::add_packages;
use picket::check::{BoundaryCheck, ImportChecker};
use picket::config::{find_project_root, project_config_path, ProjectConfig};
use picket::Tag;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

use crate::cli::Cli;

/// Convert source paths into tagged packages and infer their dependency constraints
pub fn cmd_add(paths: Vec<PathBuf>, tags: Vec<String>) -> Result<()> {
    info!("Adding {} path(s) as packages", paths.len());

    let tags: BTreeSet<Tag> = tags.into_iter().map(Tag::new).collect();
    let checker = ImportChecker::new();
    let report = add_packages(&paths, &tags, &checker)?;

    for advisory in &report.advisories {
        eprintln!("Warning: {}", advisory);
    }
    for path in &report.created {
        println!("Added package: {}", path.display());
    }
    if let Some(warning) = &report.warning {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}

/// Check that imports respect the declared package boundaries
pub fn cmd_check() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let root = find_project_root(&cwd)?;
    info!("Checking module boundaries under: {}", root.display());

    let project_config = ProjectConfig::load(&project_config_path(&root))?;
    let checker = ImportChecker::new();
    let violations = checker.check(&root, &project_config, &project_config.exclude)?;

    if violations.is_empty() {
        println!("All module boundaries are satisfied");
        return Ok(());
    }

    for violation in &violations {
        println!("{}", violation);
    }
    println!("\nTotal: {} violation(s)", violations.len());

    Err(anyhow::anyhow!("Boundary check failed"))
}

/// Generate shell completion scripts on stdout
pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
