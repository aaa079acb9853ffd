use std::fmt;

use thiserror::Error;

/// Result type alias using CibError
pub type Result<T> = std::result::Result<T, CibError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and exit-status decisions in the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Command shape
    Usage,

    // Validation
    InvalidInput,
    InvalidId,
    IdInUse,
    InvalidScore,
    InvalidResource,
    BadOption,
    InvalidRule,

    // Constraint semantics
    DuplicateConstraint,
    NotFound,

    // Node fan-out
    NodeCommunication,
    AggregateRemote,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Usage => "ERR_USAGE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidId => "ERR_INVALID_ID",
            ExErrorKind::IdInUse => "ERR_ID_IN_USE",
            ExErrorKind::InvalidScore => "ERR_INVALID_SCORE",
            ExErrorKind::InvalidResource => "ERR_INVALID_RESOURCE",
            ExErrorKind::BadOption => "ERR_BAD_OPTION",
            ExErrorKind::InvalidRule => "ERR_INVALID_RULE",
            ExErrorKind::DuplicateConstraint => "ERR_DUPLICATE_CONSTRAINT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NodeCommunication => "ERR_NODE_COMMUNICATION",
            ExErrorKind::AggregateRemote => "ERR_AGGREGATE_REMOTE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the
/// human-readable message printed by the CLI.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    details: Vec<String>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            details: Vec::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add per-item details (duplicate renderings, failing nodes)
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl fmt::Display for ExError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// One failing cluster member in a fan-out operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    pub node: String,
    pub reason: String,
}

impl fmt::Display for NodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.node, self.reason)
    }
}

/// Domain error taxonomy for constraint and node operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CibError {
    // ===== Command Shape =====
    /// Malformed command: wrong argument count or order
    #[error("{message}")]
    Usage { command: String, message: String },

    // ===== Validation Errors =====
    /// Identifier is not a well-formed XML id
    #[error("invalid {description} '{id}', {reason}")]
    InvalidId {
        id: String,
        description: String,
        reason: String,
    },

    /// Identifier already used somewhere in the CIB
    #[error("id '{id}' is already in use, please specify another one")]
    IdInUse { id: String },

    /// Score is neither an integer nor (-)INFINITY
    #[error("invalid score '{score}', use integer or INFINITY or -INFINITY")]
    InvalidScore { score: String },

    /// Resource reference cannot be used in a constraint
    #[error("{message}")]
    InvalidResource {
        resource_id: String,
        message: String,
    },

    /// Option name not accepted without --force
    #[error("bad option '{name}', use --force to override")]
    BadOption { name: String },

    /// Option value outside its allowed vocabulary
    #[error("invalid {option} value '{value}', allowed values are: {allowed}")]
    InvalidOptionValue {
        option: String,
        value: String,
        allowed: String,
    },

    /// Rule tokens do not form a valid expression
    #[error("'{rule}' is not a valid rule expression: {reason}")]
    InvalidRule { rule: String, reason: String },

    /// Rule options are inconsistent (score vs score-attribute, role)
    #[error("{message}")]
    InvalidRuleOption { message: String },

    // ===== Constraint Semantics =====
    /// Candidate matches existing constraints under the kind's key
    #[error("duplicate constraint already exists, use --force to override\n{}", .rendered.join("\n"))]
    DuplicateConstraint { rendered: Vec<String> },

    /// No constraint or rule with the id
    #[error("Unable to find constraint - '{constraint_id}'")]
    ConstraintNotFound { constraint_id: String },

    /// No location constraint to attach a rule to
    #[error("Unable to find constraint: {constraint_id}")]
    RuleParentNotFound { constraint_id: String },

    /// No location constraint with the id
    #[error("resource location id: {constraint_id} not found.")]
    LocationNotFound { constraint_id: String },

    /// No rule with the id in any location constraint
    #[error("unable to find rule with id: {rule_id}")]
    RuleNotFound { rule_id: String },

    /// Order removal matched nothing
    #[error("No matching resources found in ordering list")]
    NoMatchingResources { resource_ids: Vec<String> },

    // ===== Node Fan-out =====
    /// Single node transport failure
    #[error("Unable to connect to {node} ({reason})")]
    NodeCommunication { node: String, reason: String },

    /// Every failure of a fan-out batch, raised once all nodes were attempted
    #[error("{} node(s) failed:\n{}", .failures.len(), .failures.iter().map(|f| format!("  {}", f)).collect::<Vec<_>>().join("\n"))]
    AggregateRemote { failures: Vec<NodeFailure> },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CibError {
    pub(crate) fn usage(command: &str, message: impl Into<String>) -> Self {
        CibError::Usage {
            command: command.to_string(),
            message: message.into(),
        }
    }
}

/// Conversion from CibError to ExError
impl From<CibError> for ExError {
    fn from(err: CibError) -> Self {
        let message = err.to_string();
        match err {
            CibError::Usage { command, .. } => ExError::new(ExErrorKind::Usage)
                .with_op(command)
                .with_message(message),
            CibError::InvalidId { id, .. } => ExError::new(ExErrorKind::InvalidId)
                .with_entity_id(id)
                .with_message(message),
            CibError::IdInUse { id } => ExError::new(ExErrorKind::IdInUse)
                .with_entity_id(id)
                .with_message(message),
            CibError::InvalidScore { .. } => {
                ExError::new(ExErrorKind::InvalidScore).with_message(message)
            }
            CibError::InvalidResource { resource_id, .. } => {
                ExError::new(ExErrorKind::InvalidResource)
                    .with_entity_id(resource_id)
                    .with_message(message)
            }
            CibError::BadOption { .. } => ExError::new(ExErrorKind::BadOption).with_message(message),
            CibError::InvalidOptionValue { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            CibError::InvalidRule { .. } | CibError::InvalidRuleOption { .. } => {
                ExError::new(ExErrorKind::InvalidRule).with_message(message)
            }
            CibError::DuplicateConstraint { rendered } => {
                ExError::new(ExErrorKind::DuplicateConstraint)
                    .with_message(message)
                    .with_details(rendered)
            }
            CibError::ConstraintNotFound { constraint_id }
            | CibError::RuleParentNotFound { constraint_id }
            | CibError::LocationNotFound { constraint_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(constraint_id)
                .with_message(message),
            CibError::RuleNotFound { rule_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(rule_id)
                .with_message(message),
            CibError::NoMatchingResources { .. } => {
                ExError::new(ExErrorKind::NotFound).with_message(message)
            }
            CibError::NodeCommunication { node, .. } => {
                ExError::new(ExErrorKind::NodeCommunication)
                    .with_entity_id(node)
                    .with_message(message)
            }
            CibError::AggregateRemote { failures } => ExError::new(ExErrorKind::AggregateRemote)
                .with_message(message)
                .with_details(failures.iter().map(|f| f.to_string()).collect()),
            CibError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}
