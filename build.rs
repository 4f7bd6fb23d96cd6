// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("picket")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Picket Project")
        .about("A module boundary checker for Python codebases")
        .subcommand_required(false)
        .subcommand(
            Command::new("add")
                .about("Convert source paths into tagged packages and infer their dependencies")
                .arg(
                    Arg::new("paths")
                        .num_args(1..)
                        .required(true)
                        .help("Files or directories to convert into packages"),
                )
                .arg(
                    Arg::new("tags")
                        .short('t')
                        .long("tag")
                        .action(clap::ArgAction::Append)
                        .help("Tag to apply to every new package (repeatable)"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check that imports respect the declared package boundaries"),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("picket.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
