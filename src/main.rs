// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Add { paths, tags }) => commands::cmd_add(paths, tags),
        Some(Commands::Check) => commands::cmd_check(),
        Some(Commands::Completions { shell }) => commands::cmd_completions(shell),
        None => {
            // No command provided, show help
            println!("picket v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'picket --help' for usage information");
            Ok(())
        }
    }
}
