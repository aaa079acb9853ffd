#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cibctl_core::render::{colocation_show, order_show, ticket_show};
use cibctl_core::{CibError, CommandOptions};
use common::{run, run_with, sample_cib, setup};

#[test]
fn test_order_set_ids_and_listing() {
    let cib = setup(&["order set A B sequential=false set C setoptions kind=Optional"]);
    assert_eq!(
        order_show(&cib.constraints, false),
        vec![
            "Ordering Constraints:",
            "  Resource Sets:",
            "    set A B sequential=false set C setoptions kind=Optional",
        ]
    );
    assert_eq!(
        order_show(&cib.constraints, true)[2],
        "    set A B sequential=false (id:order_set_A_B_set_C_set) set C (id:order_set_A_B_set_C_set-1) setoptions kind=Optional (id:order_set_A_B_set_C)"
    );
}

#[test]
fn test_colocation_set_defaults_score() {
    let cib = setup(&["colocation set A B"]);
    assert_eq!(
        colocation_show(&cib.constraints, false),
        vec![
            "Colocation Constraints:",
            "  Resource Sets:",
            "    set A B setoptions score=INFINITY",
        ]
    );
}

#[test]
fn test_set_options_are_validated() {
    let err = run(sample_cib(), "order set A B role=bogus").unwrap_err();
    assert!(matches!(err, CibError::InvalidOptionValue { .. }));

    let err = run(sample_cib(), "order set A B setoptions foo=bar").unwrap_err();
    assert_eq!(err.to_string(), "bad option 'foo', use --force to override");
    assert!(run_with(sample_cib(), "order set A B setoptions foo=bar", CommandOptions::forced()).is_ok());

    let err = run(sample_cib(), "colocation set A B setoptions score=high").unwrap_err();
    assert!(matches!(err, CibError::InvalidScore { .. }));
}

#[test]
fn test_set_members_are_resolved() {
    let err = run(sample_cib(), "order set A web").unwrap_err();
    assert!(matches!(err, CibError::InvalidResource { .. }));

    let opts = CommandOptions {
        autocorrect: true,
        ..Default::default()
    };
    let outcome = run_with(sample_cib(), "order set A web", opts).unwrap();
    assert_eq!(
        order_show(&outcome.cib.constraints, false)[2],
        "    set A web-clone"
    );
}

#[test]
fn test_ticket_set_requires_ticket() {
    let err = run(sample_cib(), "ticket set A setoptions loss-policy=stop").unwrap_err();
    assert!(matches!(err, CibError::Usage { .. }));

    let cib = setup(&["ticket set A B setoptions ticket=T loss-policy=stop"]);
    assert_eq!(
        ticket_show(&cib.constraints, false)[2],
        "    set A B setoptions loss-policy=stop ticket=T"
    );
}

#[test]
fn test_ticket_add_listing() {
    let cib = setup(&["ticket add T master A loss-policy=fence"]);
    assert_eq!(
        ticket_show(&cib.constraints, true),
        vec![
            "Ticket Constraints:",
            "  Master A loss-policy=fence ticket=T (id:ticket-T-A-Master)",
        ]
    );
}

#[test]
fn test_ticket_add_rejects_unknown_option() {
    let err = run(sample_cib(), "ticket add T A color=red").unwrap_err();
    assert!(matches!(err, CibError::BadOption { .. }));
}

#[test]
fn test_set_constraints_are_never_duplicates() {
    let cib = setup(&["order set A B", "order set A B"]);
    assert_eq!(cib.constraints.len(), 2);
}
