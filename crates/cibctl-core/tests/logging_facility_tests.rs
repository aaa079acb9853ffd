#![allow(clippy::unwrap_used, clippy::expect_used)]

use cibctl_core::errors::CibError;
use cibctl_core::logging_facility::test_capture::init_test_capture;
use cibctl_core::{
    log_cmd_end, log_cmd_error, log_cmd_item_failure, log_cmd_start, parse_constraint_args,
    CommandOptions,
};
use cibctl_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_ITEM_FAILED, EVENT_START};

fn command(line: &str) -> cibctl_core::Command {
    let argv: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    parse_constraint_args(&argv).unwrap()
}

#[test]
fn test_start_records_subject_and_flags() {
    let capture = init_test_capture();
    let cmd = command("location remove l1");
    let opts = CommandOptions {
        force: true,
        ..Default::default()
    };

    log_cmd_start!(&cmd, &opts);

    let events = capture.events_for_op("location_remove");
    let start = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    assert_eq!(start.field("subject"), Some("l1"));
    assert_eq!(start.field("read_only"), Some("false"));
    assert_eq!(start.field("force"), Some("true"));
    assert_eq!(start.field("autocorrect"), Some("false"));
    assert!(start.component.is_some());
}

#[test]
fn test_end_records_outcome() {
    let capture = init_test_capture();

    log_cmd_end!("ticket_add", duration_ms = 42, persisted = true, failure_count = 0);

    let end_events: Vec<_> = capture
        .events_for_op("ticket_add")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end_events.len(), 1);
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
    assert_eq!(end_events[0].field("persisted"), Some("true"));
    assert_eq!(end_events[0].field("failure_count"), Some("0"));
}

#[test]
fn test_error_includes_kind_code_and_entity() {
    let capture = init_test_capture();

    let err = CibError::RuleNotFound {
        rule_id: "r1".to_string(),
    };
    log_cmd_error!("rule_remove", err, duration_ms = 10);

    capture.assert_event_exists("rule_remove", EVENT_END_ERROR);
    let event = capture
        .events_for_op("rule_remove")
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(event.field("err.code"), Some("ERR_NOT_FOUND"));
    assert_eq!(event.field("err.kind"), Some("NotFound"));
    assert_eq!(event.field("entity_id"), Some("r1"));
}

#[test]
fn test_item_failure_names_the_constraint() {
    let capture = init_test_capture();

    let err = CibError::ConstraintNotFound {
        constraint_id: "gone".to_string(),
    };
    log_cmd_item_failure!("constraint_remove", err);

    let event = capture
        .events_for_op("constraint_remove")
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_ITEM_FAILED))
        .expect("item failure event");
    assert_eq!(event.level, tracing::Level::WARN);
    assert_eq!(event.field("entity_id"), Some("gone"));
    assert_eq!(event.field("err.code"), Some("ERR_NOT_FOUND"));
}
