//! cibctl core - in-memory constraint kernel for pacemaker CIBs
//!
//! This crate holds everything between a loaded configuration and the text
//! printed back to the administrator:
//! - Arena document of the `<constraints>` section with typed constraint kinds
//! - Location, order, colocation, ticket and set constraint commands
//! - Duplicate detection, reference maintenance and removal
//! - Rule expression parser, builder and renderers
//! - Console listings (`constraint show`)
//! - Parallel fan-out of node requests
//!
//! Reading and writing CIB XML lives in `cibctl-store`; persisting and
//! logging around a command lives in `cibctl-engine`.

pub mod apply;
pub mod cib;
pub mod commands;
pub mod document;
pub mod duplicates;
pub mod errors;
pub mod ids;
pub mod logging_facility;
pub mod model;
pub mod nodes;
pub mod ops;
pub mod options;
pub mod parse;
pub mod render;
pub mod rules;

pub use cibctl_core_types::schema;

// Re-export commonly used types
pub use apply::{apply, Outcome};
pub use cib::Cib;
pub use commands::{parse_constraint_args, parse_references_args, Command};
pub use document::{Document, Element, NodeId, Tag};
pub use errors::{CibError, ExError, ExErrorKind, NodeFailure, Result};
pub use options::CommandOptions;
