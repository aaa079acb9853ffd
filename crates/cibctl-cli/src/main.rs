//! cibctl CLI
//!
//! Command-line interface for pacemaker CIB constraints

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod global_flags;

#[derive(Debug, Parser)]
#[command(name = "cibctl")]
#[command(about = "cibctl - manage cluster constraints in the CIB", long_about = None)]
struct Cli {
    /// CIB file to operate on instead of the configured one
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Accept duplicates, unknown options and clone-child references
    #[arg(long)]
    force: bool,

    /// Replace clone/master children with their parent
    #[arg(long)]
    autocorrect: bool,

    /// Show constraint ids in listings
    #[arg(long)]
    full: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Location, order, colocation and ticket constraints
    Constraint(commands::RawArgs),
    /// Clean up constraints that mention a resource or node
    References(commands::RawArgs),
}

fn main() {
    let cli = Cli::parse_from(global_flags::hoist(std::env::args()));

    match commands::execute(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e.message());
            std::process::exit(1);
        }
    }
}
