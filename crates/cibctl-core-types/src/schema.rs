//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_CONSTRAINT_ID: &str = "constraint_id";
pub const FIELD_RESOURCE_ID: &str = "resource_id";
pub const FIELD_RULE_ID: &str = "rule_id";
pub const FIELD_NODE: &str = "node";
/// Constraint, resource, rule or node id a command acts on
pub const FIELD_SUBJECT: &str = "subject";
/// Id an error concerns
pub const FIELD_ENTITY_ID: &str = "entity_id";

// Command outcome
pub const FIELD_PERSISTED: &str = "persisted";
pub const FIELD_FAILURE_COUNT: &str = "failure_count";

// Collection sizes
pub const FIELD_CONSTRAINT_COUNT: &str = "constraint_count";
pub const FIELD_NODE_COUNT: &str = "node_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
/// One id of a batch command failed while the rest were applied
pub const EVENT_ITEM_FAILED: &str = "item_failed";
