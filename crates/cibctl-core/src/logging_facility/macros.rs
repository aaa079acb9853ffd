//! Command logging macros
//!
//! Every constraint command logs one start event and exactly one of an end
//! or end_error event, all keyed by the command's op name.

/// Log the start of a command with its subject and flags
///
/// # Example
///
/// ```
/// # use cibctl_core::{log_cmd_start, Command, CommandOptions};
/// let cmd = Command::LocationRemove { id: "loc-1".to_string() };
/// log_cmd_start!(&cmd, &CommandOptions::default());
/// ```
#[macro_export]
macro_rules! log_cmd_start {
    ($cmd:expr, $opts:expr) => {{
        let cmd: &$crate::commands::Command = $cmd;
        let opts: &$crate::options::CommandOptions = $opts;
        tracing::info!(
            component = module_path!(),
            op = cmd.name(),
            event = $crate::schema::EVENT_START,
            subject = cmd.subject().unwrap_or_default(),
            read_only = cmd.is_read_only(),
            force = opts.force,
            autocorrect = opts.autocorrect,
        );
    }};
}

/// Log the successful end of a command
///
/// # Example
///
/// ```
/// # use cibctl_core::log_cmd_end;
/// log_cmd_end!("location_remove", duration_ms = 3, persisted = true, failure_count = 0);
/// ```
#[macro_export]
macro_rules! log_cmd_end {
    ($op:expr, duration_ms = $duration:expr, persisted = $persisted:expr, failure_count = $failures:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END,
            duration_ms = $duration,
            persisted = $persisted,
            failure_count = $failures,
        );
    };
}

/// Log one failed id of a batch command whose other ids went through
///
/// # Example
///
/// ```
/// # use cibctl_core::{log_cmd_item_failure, errors::CibError};
/// let err = CibError::ConstraintNotFound { constraint_id: "gone".to_string() };
/// log_cmd_item_failure!("constraint_remove", err);
/// ```
#[macro_export]
macro_rules! log_cmd_item_failure {
    ($op:expr, $err:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_ITEM_FAILED,
            err.code = ex_err.code(),
            entity_id = ex_err.entity_id().unwrap_or_default(),
        );
    }};
}

/// Log a failed command
///
/// Accepts anything convertible into `ExError`; the constraint, resource or
/// rule id the error concerns is logged as `entity_id`.
///
/// # Example
///
/// ```
/// # use cibctl_core::{log_cmd_error, errors::CibError};
/// let err = CibError::RuleNotFound { rule_id: "r1".to_string() };
/// log_cmd_error!("rule_remove", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_cmd_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            entity_id = ex_err.entity_id().unwrap_or_default(),
        );
    }};
}
