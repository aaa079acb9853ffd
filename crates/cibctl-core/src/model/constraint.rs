//! Typed constraint records
//!
//! Each constraint kind keeps the attributes the constraint commands reason
//! about as typed fields. Anything else (`lifetime` attributes, future
//! pacemaker options, `--force`d names) lands in the ordered `extra` bag and
//! is written back untouched.

use super::attributes::attribute_record;

/// Default action for order constraints and resource sets
pub const DEFAULT_ACTION: &str = "start";

/// Default role for colocation and ticket constraints
pub const DEFAULT_ROLE: &str = "Started";

/// Actions accepted in `order` shorthand and set options
pub const ACTIONS: &[&str] = &["start", "promote", "demote", "stop"];

/// Roles accepted in set options and ticket constraints
pub const ROLES: &[&str] = &["Stopped", "Started", "Master", "Slave"];

/// Values accepted for the order `kind` attribute
pub const ORDER_KINDS: &[&str] = &["Optional", "Mandatory", "Serialize"];

/// Values accepted for boolean attributes such as `symmetrical`
pub const BOOLEAN_VALUES: &[&str] = &["true", "false"];

/// Values accepted for the ticket `loss-policy` attribute
pub const LOSS_POLICIES: &[&str] = &["fence", "stop", "freeze", "demote"];

attribute_record! {
    /// `rsc_location`: pins a resource towards or away from a node
    ///
    /// Rule-based location constraints carry no `node`/`score`; their rules are
    /// child nodes in the document.
    pub struct LocationConstraint {
        rsc => "rsc",
        node => "node",
        score => "score",
        role => "role",
        resource_discovery => "resource-discovery",
    }
}

attribute_record! {
    /// `rsc_order`: sequences actions of two resources, or of resource sets
    pub struct OrderConstraint {
        first => "first",
        then => "then",
        first_action => "first-action",
        then_action => "then-action",
        kind => "kind",
        score => "score",
        symmetrical => "symmetrical",
    }
}

attribute_record! {
    /// `rsc_colocation`: keeps two resources (or sets) together or apart
    pub struct ColocationConstraint {
        rsc => "rsc",
        with_rsc => "with-rsc",
        score => "score",
        rsc_role => "rsc-role",
        with_rsc_role => "with-rsc-role",
    }
}

attribute_record! {
    /// `rsc_ticket`: ties a resource (or sets) to a cluster ticket
    pub struct TicketConstraint {
        ticket => "ticket",
        rsc => "rsc",
        rsc_role => "rsc-role",
        loss_policy => "loss-policy",
    }
}

attribute_record! {
    /// `resource_set`: ordered group of resource references
    pub struct ResourceSet {
        sequential => "sequential",
        require_all => "require-all",
        action => "action",
        role => "role",
        kind => "kind",
        score => "score",
    }
}

/// `resource_ref`: membership of a resource in a set
///
/// The `id` names the referenced resource; it is not an identifier of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: String,
}

impl ResourceRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Lower-case everything, then upper-case the first letter
///
/// `"master"` and `"MASTER"` both become `"Master"`.
pub fn capitalize(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
