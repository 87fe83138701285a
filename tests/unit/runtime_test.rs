//! Tests for the scheduler-facing API models

use lockable_resources::builders::PoolBuilder;
use lockable_resources::core::Resource;
use lockable_resources::runtime::{
    check_admission, health, list_resources, release_item, AdmissionRequest, AdmissionStatus,
};

fn gate() -> lockable_resources::builders::Gate {
    PoolBuilder::new()
        .resource(Resource::new("A").with_labels(["gpu"]).with_description("first"))
        .resource(Resource::new("B").with_labels(["gpu"]))
        .build()
        .unwrap()
}

fn request(item_id: u64, json_requirement: &str) -> AdmissionRequest {
    serde_json::from_str(&format!(
        r#"{{ "item_id": {item_id}, "job_name": "job-{item_id}", "requirement": {json_requirement} }}"#
    ))
    .unwrap()
}

#[test]
fn test_check_admission_round_trip() {
    let gate = gate();
    let req = request(1, r#"{ "kind": "by_label", "items": [ { "label": "gpu", "count": 2 } ] }"#);

    let admitted = check_admission(&gate.admission, req).unwrap();
    assert_eq!(admitted.status, AdmissionStatus::Admitted);
    assert_eq!(admitted.resources, vec!["A".to_string(), "B".to_string()]);
    assert!(admitted.reason.is_none());

    let blocked = check_admission(
        &gate.admission,
        request(2, r#"{ "kind": "by_name", "items": ["A"] }"#),
    )
    .unwrap();
    assert_eq!(blocked.status, AdmissionStatus::Blocked);
    assert_eq!(blocked.reason.as_deref(), Some("Waiting for resources [A]"));
    assert_eq!(blocked.resources, vec!["A".to_string()]);

    let released = release_item(&gate.release, 1);
    assert_eq!(released.released.len(), 2);
    assert_eq!(health(&gate.pool).free, 2);
}

#[test]
fn test_check_admission_without_requirement() {
    let gate = gate();
    let req: AdmissionRequest =
        serde_json::from_str(r#"{ "item_id": 9, "job_name": "free" }"#).unwrap();
    let response = check_admission(&gate.admission, req).unwrap();
    assert_eq!(response.status, AdmissionStatus::Admitted);
    assert!(response.resources.is_empty());
}

#[test]
fn test_check_admission_reports_held_resources_without_requirement() {
    let gate = gate();
    check_admission(
        &gate.admission,
        request(4, r#"{ "kind": "by_name", "items": ["A"] }"#),
    )
    .unwrap();

    let req: AdmissionRequest =
        serde_json::from_str(r#"{ "item_id": 4, "job_name": "job-4" }"#).unwrap();
    let response = check_admission(&gate.admission, req).unwrap();
    assert_eq!(response.status, AdmissionStatus::Admitted);
    assert_eq!(response.resources, vec!["A".to_string()]);
}

#[test]
fn test_check_admission_unknown_resource() {
    let gate = gate();
    let err = check_admission(
        &gate.admission,
        request(3, r#"{ "kind": "by_name", "items": ["Z"] }"#),
    )
    .unwrap_err();
    assert_eq!(err, "The following resources do not exist: [Z]");
}

#[test]
fn test_list_resources_and_health() {
    let gate = gate();
    check_admission(
        &gate.admission,
        request(4, r#"{ "kind": "by_name", "items": ["B"] }"#),
    )
    .unwrap();

    let listing = list_resources(&gate.pool);
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].description, "first");
    assert_eq!(listing[0].labels, vec!["gpu".to_string()]);
    assert_eq!(listing[0].reserved_by, None);
    assert_eq!(listing[1].reserved_by, Some(4));

    let h = health(&gate.pool);
    assert!(h.ok);
    assert_eq!(h.resources, 2);
    assert_eq!(h.free, 1);
}
