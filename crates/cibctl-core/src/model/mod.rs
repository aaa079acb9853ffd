//! Typed in-memory model of the constraint section and resource index

pub mod attributes;
pub mod constraint;
pub mod raw;
pub mod resources;
pub mod rule;

pub use attributes::Attributes;
pub use constraint::{
    capitalize, ColocationConstraint, LocationConstraint, OrderConstraint, ResourceRef,
    ResourceSet, TicketConstraint,
};
pub use raw::{RawElement, RawNode};
pub use resources::{ResourceEntry, ResourceIndex, ResourceKind};
pub use rule::{DateExpression, DateParts, Expression, Rule, RuleChild};
