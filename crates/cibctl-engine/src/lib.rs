//! cibctl engine - command orchestration
//!
//! Runs one parsed command against a `CibStore`: load, apply, persist when
//! the configuration changed. This is the layer that emits the operation
//! lifecycle events (`start`, `end`, `end_error`).

pub mod execute;

pub use execute::{execute, Execution};
