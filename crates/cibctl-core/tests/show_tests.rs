#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cibctl_core::CommandOptions;
use common::{run, run_with, sample_cib, setup, show};

#[test]
fn test_empty_listing_has_every_section() {
    assert_eq!(
        show(&sample_cib(), false),
        vec![
            "Location Constraints:",
            "Ordering Constraints:",
            "Colocation Constraints:",
            "Ticket Constraints:",
        ]
    );
}

#[test]
fn test_full_listing() {
    let cib = setup(&[
        "location add l1 A n1 INFINITY",
        "location add l2 A n2 -INFINITY",
        "order A then B",
        "colocation add C with D -100",
        "ticket add T D",
    ]);
    let full = CommandOptions {
        full: true,
        ..Default::default()
    };
    let outcome = run_with(cib, "show", full).unwrap();
    assert!(!outcome.changed);
    assert_eq!(
        outcome.output,
        vec![
            "Location Constraints:",
            "  Resource: A",
            "    Enabled on: n1 (score:INFINITY) (id:l1)",
            "    Disabled on: n2 (score:-INFINITY) (id:l2)",
            "Ordering Constraints:",
            "  start A then start B (kind:Mandatory) (id:order-A-B-mandatory)",
            "Colocation Constraints:",
            "  C with D (score:-100) (id:colocation-C-D--100)",
            "Ticket Constraints:",
            "  D ticket=T (id:ticket-T-D)",
        ]
    );
}

#[test]
fn test_location_by_node_with_filter() {
    let cib = setup(&["location add l1 A n1 10", "location add l2 B n2 10"]);
    let outcome = run(cib, "location show nodes n2").unwrap();
    assert_eq!(
        outcome.output,
        vec![
            "Location Constraints:",
            "  Node: n2",
            "    Allowed to run:",
            "      B (l2) Score: 10",
        ]
    );
}

#[test]
fn test_bare_constraint_command_lists_everything() {
    let outcome = run(setup(&["order A then B"]), "").unwrap();
    assert_eq!(outcome.output.len(), 5);
}

#[test]
fn test_location_by_node_hides_rule_ids_with_full() {
    let cib = setup(&["location A rule score=100 #uname eq node1"]);
    let full = CommandOptions {
        full: true,
        ..Default::default()
    };
    let outcome = run_with(cib, "location show nodes", full).unwrap();
    assert_eq!(
        outcome.output,
        vec![
            "Location Constraints:",
            "  Resource: A",
            "    Constraint: location-A",
            "      Rule: score=100",
            "        Expression: #uname eq node1",
        ]
    );
}
