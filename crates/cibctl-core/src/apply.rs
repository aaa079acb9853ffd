//! Functional-boundary apply function
//!
//! `apply()` takes ownership of a loaded configuration, runs one command
//! against it and hands back the (possibly) modified configuration together
//! with the console output.
//!
//! ## Atomicity Contract
//!
//! - A command that fails returns `Err` and its partial edits are dropped
//!   with the configuration it was given
//! - Batch removal is the exception: each id is applied on its own and the
//!   failures travel in [`Outcome::failures`] next to the successful edits
//! - No panics: invalid input returns typed errors
//!
//! ## Example
//!
//! ```
//! use cibctl_core::{apply, Cib, Command, CommandOptions};
//! use cibctl_core::model::{ResourceIndex, ResourceKind};
//! use cibctl_core::document::Document;
//!
//! let mut resources = ResourceIndex::new();
//! resources.insert("A", ResourceKind::Primitive, None);
//! resources.insert("B", ResourceKind::Primitive, None);
//! let cib = Cib::new(resources, Document::new());
//!
//! let cmd = Command::OrderAdd {
//!     first: "A".to_string(),
//!     then: "B".to_string(),
//!     tokens: Vec::new(),
//! };
//! let outcome = apply(cib, cmd, &CommandOptions::default()).unwrap();
//! assert!(outcome.changed);
//! assert_eq!(outcome.output, vec!["Adding A B (kind: Mandatory)"]);
//! ```

use crate::cib::Cib;
use crate::commands::Command;
use crate::errors::{CibError, Result};
use crate::ops::{colocation, location, order, references, remove, sets, ticket};
use crate::options::CommandOptions;
use crate::render;

/// What a command produced
#[derive(Debug, Clone)]
pub struct Outcome {
    pub cib: Cib,
    /// Console lines, in order
    pub output: Vec<String>,
    /// Whether `cib` has to be written back
    pub changed: bool,
    /// Per-item failures of a batch command whose other items succeeded
    pub failures: Vec<CibError>,
}

impl Outcome {
    fn changed(cib: Cib, output: Vec<String>) -> Self {
        Self {
            cib,
            output,
            changed: true,
            failures: Vec::new(),
        }
    }

    fn unchanged(cib: Cib, output: Vec<String>) -> Self {
        Self {
            cib,
            output,
            changed: false,
            failures: Vec::new(),
        }
    }
}

/// Apply a command to a configuration
///
/// # Errors
///
/// Any `CibError` raised by the command. The configuration passed in is
/// consumed either way; callers that need it after a failure reload it.
pub fn apply(mut cib: Cib, cmd: Command, opts: &CommandOptions) -> Result<Outcome> {
    match cmd {
        Command::LocationAdd {
            id,
            rsc,
            node,
            score,
            options,
        } => {
            let out = location::location_add(&mut cib, &id, &rsc, &node, &score, &options, opts)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::LocationRemove { id } => {
            let out = location::location_remove(&mut cib, &id)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::LocationPrefer {
            rsc,
            preference,
            nodes,
        } => {
            let out = location::location_prefer(&mut cib, &rsc, preference, &nodes, opts)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::LocationRule { rsc, tokens } => {
            let out = location::location_rule(&mut cib, &rsc, &tokens, opts)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::LocationShow { view, filter } => {
            let out = render::location_show(&cib.constraints, view, &filter, opts.full);
            Ok(Outcome::unchanged(cib, out))
        }

        Command::OrderAdd {
            first,
            then,
            tokens,
        } => {
            let out = order::order_add(&mut cib, &first, &then, &tokens, opts)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::OrderRemove { resources } => {
            let out = order::order_remove(&mut cib, &resources)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::OrderShow => {
            let out = render::order_show(&cib.constraints, opts.full);
            Ok(Outcome::unchanged(cib, out))
        }

        Command::ColocationAdd(spec) => {
            let out = colocation::colocation_add(&mut cib, &spec, opts)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::ColocationRemove { rsc, with_rsc } => {
            let before = cib.constraints.len();
            let out = colocation::colocation_remove(&mut cib, &rsc, &with_rsc)?;
            let changed = cib.constraints.len() != before;
            Ok(Outcome {
                changed,
                ..Outcome::unchanged(cib, out)
            })
        }
        Command::ColocationShow => {
            let out = render::colocation_show(&cib.constraints, opts.full);
            Ok(Outcome::unchanged(cib, out))
        }

        Command::TicketAdd(spec) => {
            let out = ticket::ticket_add(&mut cib, &spec, opts)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::TicketShow => {
            let out = render::ticket_show(&cib.constraints, opts.full);
            Ok(Outcome::unchanged(cib, out))
        }

        Command::SetCreate { kind, args } => {
            let out = sets::create_with_set(&mut cib, kind, &args, opts)?;
            Ok(Outcome::changed(cib, out))
        }

        Command::ConstraintRemove { ids } => {
            let batch = remove::constraint_remove(&mut cib, &ids);
            Ok(Outcome {
                cib,
                output: batch.lines,
                changed: !batch.removed.is_empty(),
                failures: batch.failures,
            })
        }
        Command::ConstraintShow { view, filter } => {
            let out = render::constraint_show(&cib.constraints, view, &filter, opts.full);
            Ok(Outcome::unchanged(cib, out))
        }
        Command::ConstraintRef { resources } => {
            let out = references::constraint_ref(&cib, &resources);
            Ok(Outcome::unchanged(cib, out))
        }

        Command::RuleAdd {
            constraint_id,
            tokens,
        } => {
            let out = remove::rule_add(&mut cib, &constraint_id, &tokens, opts)?;
            Ok(Outcome::changed(cib, out))
        }
        Command::RuleRemove { rule_id } => {
            let out = remove::rule_remove(&mut cib, &rule_id)?;
            Ok(Outcome::changed(cib, out))
        }

        Command::ReferencesRemove { rsc } => {
            let out = references::remove_constraints_containing(&mut cib, &rsc)?;
            let changed = !out.is_empty();
            Ok(Outcome {
                changed,
                ..Outcome::unchanged(cib, out)
            })
        }
        Command::ReferencesReparent { rsc } => {
            let rewritten = references::constraint_resource_update(&mut cib, &rsc);
            Ok(Outcome {
                changed: rewritten > 0,
                ..Outcome::unchanged(cib, Vec::new())
            })
        }
        Command::ReferencesRemoveNode { node } => {
            let out = references::remove_constraints_containing_node(&mut cib, &node);
            let changed = !out.is_empty();
            Ok(Outcome {
                changed,
                ..Outcome::unchanged(cib, out)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::parse_constraint_args;
    use crate::document::Document;
    use crate::model::{ResourceIndex, ResourceKind};

    fn cib() -> Cib {
        let mut resources = ResourceIndex::new();
        for id in ["A", "B"] {
            resources.insert(id, ResourceKind::Primitive, None);
        }
        Cib::new(resources, Document::new())
    }

    fn run(cib: Cib, line: &str) -> Result<Outcome> {
        let argv: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        apply(cib, parse_constraint_args(&argv)?, &CommandOptions::default())
    }

    #[test]
    fn test_show_is_unchanged() {
        let outcome = run(cib(), "order show").unwrap();
        assert!(!outcome.changed);
        assert_eq!(outcome.output[0], "Ordering Constraints:");
    }

    #[test]
    fn test_batch_remove_reports_failures_and_keeps_successes() {
        let outcome = run(cib(), "order A then B").unwrap();
        let outcome = run(outcome.cib, "remove order-A-B-mandatory missing").unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.cib.constraints.is_empty());
    }

    #[test]
    fn test_colocation_remove_without_match_is_unchanged() {
        let outcome = run(cib(), "colocation remove A B").unwrap();
        assert!(!outcome.changed);
        assert_eq!(
            outcome.output,
            vec!["No matching resources found in ordering list"]
        );
    }
}
