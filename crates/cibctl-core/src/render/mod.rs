//! Console rendering of constraints

pub mod plain;
pub mod show;

pub use plain::{colocation_plain, constraint_plain, order_plain, set_constraint_plain, ticket_plain};
pub use show::{
    colocation_show, constraint_show, location_show, order_show, ticket_show, LocationView,
};
