//! Tests for audit sink

use std::collections::HashSet;

use lockable_resources::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        1,
        Some("job1"),
        AuditAction::Reserve,
        vec!["A".to_string()],
        None,
    );

    sink.record(event);
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].item, 1);
    assert_eq!(events[0].job.as_deref(), Some("job1"));
    assert_eq!(events[0].action, AuditAction::Reserve);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(1, None, AuditAction::Reserve, vec![], None));
    sink.record(build_audit_event(2, None, AuditAction::Block, vec![], None));
    sink.record(build_audit_event(3, None, AuditAction::Release, vec![], None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].item, 2); // First one popped
    assert_eq!(events[1].item, 3);
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(
        42,
        Some("deploy"),
        AuditAction::Block,
        vec!["gpu".to_string()],
        Some("Waiting for resources with label gpu".to_string()),
    );

    assert_eq!(event.item, 42);
    assert_eq!(event.action, AuditAction::Block);
    assert_eq!(event.resources, vec!["gpu".to_string()]);
    assert_eq!(
        event.detail.as_deref(),
        Some("Waiting for resources with label gpu")
    );
    assert!(!event.event_id.is_empty());
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_back_to_back_events_have_distinct_ids() {
    let first = build_audit_event(5, None, AuditAction::Block, vec![], None);
    let second = build_audit_event(5, None, AuditAction::Block, vec![], None);
    assert_ne!(first.event_id, second.event_id);

    let ids: HashSet<String> = (0..100)
        .map(|_| build_audit_event(5, None, AuditAction::Block, vec![], None).event_id)
        .collect();
    assert_eq!(ids.len(), 100);
}
