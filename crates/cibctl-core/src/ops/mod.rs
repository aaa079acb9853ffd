//! Constraint commands operating on an in-memory `Cib`
//!
//! Every operation mutates the configuration in place and returns the
//! console lines it produced. Errors leave the caller to discard the
//! configuration; nothing here persists anything.

pub mod colocation;
pub mod location;
pub mod order;
pub mod references;
pub mod remove;
pub mod sets;
pub mod ticket;

use crate::document::{Document, NodeId};
use crate::errors::CibError;
use crate::render::constraint_plain;

/// Duplicate error listing each conflicting constraint with its id
pub(crate) fn duplicate_error(doc: &Document, duplicates: &[NodeId]) -> CibError {
    CibError::DuplicateConstraint {
        rendered: duplicates
            .iter()
            .map(|node| format!("  {}", constraint_plain(doc, *node, true)))
            .collect(),
    }
}

/// Check `value` against an allowed vocabulary
pub(crate) fn check_allowed(option: &str, value: &str, allowed: &[&str]) -> Result<(), CibError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CibError::InvalidOptionValue {
            option: option.to_string(),
            value: value.to_string(),
            allowed: allowed.join(", "),
        })
    }
}
