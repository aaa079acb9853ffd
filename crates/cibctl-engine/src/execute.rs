//! Load → apply → persist

use std::time::Instant;

use cibctl_core::errors::ExError;
use cibctl_core::{apply, Command, CommandOptions};
use cibctl_store::errors::Result;
use cibctl_store::CibStore;

/// Result of running one command
#[derive(Debug, Clone, Default)]
pub struct Execution {
    /// Console lines, in order
    pub output: Vec<String>,
    /// Whether the store was written
    pub persisted: bool,
    /// Items of a batch command that failed while others were persisted
    pub failures: Vec<ExError>,
}

impl Execution {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run `cmd` against the configuration held by `store`
///
/// Nothing is written when the command fails or leaves the configuration
/// unchanged. A batch removal with some failing ids still persists the ids
/// that were removed and reports the rest in [`Execution::failures`].
///
/// # Errors
///
/// Load and persist failures from the store, and any command error.
pub fn execute(
    store: &mut dyn CibStore,
    cmd: Command,
    opts: &CommandOptions,
) -> Result<Execution> {
    let op = cmd.name();
    let start = Instant::now();
    cibctl_core::log_cmd_start!(&cmd, opts);

    match run(store, cmd, opts) {
        Ok(execution) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            for failure in &execution.failures {
                cibctl_core::log_cmd_item_failure!(op, failure.clone());
            }
            cibctl_core::log_cmd_end!(
                op,
                duration_ms = duration_ms,
                persisted = execution.persisted,
                failure_count = execution.failures.len()
            );
            Ok(execution)
        }
        Err(e) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            cibctl_core::log_cmd_error!(op, e.clone(), duration_ms = duration_ms);
            Err(e)
        }
    }
}

fn run(store: &mut dyn CibStore, cmd: Command, opts: &CommandOptions) -> Result<Execution> {
    let cib = store.load()?;
    let outcome = apply(cib, cmd, opts)?;

    if outcome.changed {
        store.replace_configuration(&outcome.cib)?;
        tracing::debug!(
            constraint_count = outcome.cib.constraints.constraints().len(),
            "configuration persisted"
        );
    }

    Ok(Execution {
        output: outcome.output,
        persisted: outcome.changed,
        failures: outcome.failures.into_iter().map(ExError::from).collect(),
    })
}
