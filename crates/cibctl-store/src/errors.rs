//! Error handling for cibctl-store
//!
//! Wraps cibctl-core ExError with store-specific helpers

use std::fmt::Display;

use cibctl_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an error for XML that cannot be read or written
pub fn xml_error(operation: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(format!("Unable to parse cib xml: {}", err))
}

/// Create an error for a CIB missing a required section
pub fn missing_section(section: &str) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("load_cib")
        .with_entity_id(section.to_string())
        .with_message(format!("Unable to get {} section of cib", section))
}

/// Create a configuration file error
pub fn config_error(path: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_config")
        .with_entity_id(path.to_string())
        .with_message(format!("Invalid configuration in {}: {}", path, err))
}
