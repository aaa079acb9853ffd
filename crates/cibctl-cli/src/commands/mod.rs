//! Subcommand dispatch

use clap::Args;

use cibctl_core::errors::ExError;
use cibctl_core::logging_facility;
use cibctl_core::{parse_constraint_args, parse_references_args, CommandOptions};
use cibctl_engine::execute as run_command;
use cibctl_store::{FileCibStore, StoreConfig};

use crate::{Cli, Commands};

/// Words after the subcommand, handed to the command parser untouched
#[derive(Debug, Args)]
pub struct RawArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Run the parsed command line
///
/// Returns `Ok(false)` when a batch command partly failed; each failure has
/// already been printed.
pub fn execute(cli: Cli) -> Result<bool, ExError> {
    let config = StoreConfig::from_env(cli.file.as_deref())?;
    logging_facility::init(config.log_profile()?);

    let opts = CommandOptions {
        force: cli.force,
        autocorrect: cli.autocorrect,
        full: cli.full,
    };
    let cmd = match cli.command {
        Commands::Constraint(raw) => parse_constraint_args(&raw.args)?,
        Commands::References(raw) => parse_references_args(&raw.args)?,
    };

    let mut store = FileCibStore::new(config.cib_path());
    let execution = run_command(&mut store, cmd, &opts)?;

    for line in &execution.output {
        println!("{}", line);
    }
    for failure in &execution.failures {
        eprintln!("Error: {}", failure.message());
    }
    Ok(execution.is_success())
}
