//! Tests for builder modules

use std::collections::BTreeMap;
use std::sync::Arc;

use lockable_resources::builders::{build_pool, PoolBuilder};
use lockable_resources::config::{PoolConfig, ResourceConfig};
use lockable_resources::core::{
    AuditAction, InMemoryAuditSink, PoolError, QueueItem, Requirement, Resource,
};
use parking_lot::Mutex;

fn config() -> PoolConfig {
    PoolConfig {
        resources: vec![
            ResourceConfig {
                name: "A".to_string(),
                description: String::new(),
                labels: vec!["gpu".to_string()],
                attributes: BTreeMap::new(),
            },
            ResourceConfig {
                name: "B".to_string(),
                description: String::new(),
                labels: vec![],
                attributes: BTreeMap::new(),
            },
        ],
    }
}

#[test]
fn test_build_pool_from_config() {
    let pool = build_pool(&config()).unwrap();
    assert_eq!(pool.names(), vec!["A".to_string(), "B".to_string()]);
    assert_eq!(pool.free_count(), 2);
}

#[test]
fn test_build_pool_rejects_invalid_config() {
    let err = build_pool(&PoolConfig { resources: vec![] }).unwrap_err();
    assert!(matches!(err, PoolError::InvalidConfig(_)));
}

#[test]
fn test_pool_builder_duplicate_resources() {
    let result = PoolBuilder::new()
        .resource(Resource::new("A"))
        .resource(Resource::new("A"))
        .build();
    assert!(matches!(result, Err(PoolError::DuplicateResource(_))));
}

#[test]
fn test_pool_builder_wires_shared_pool_and_audit() {
    let sink = Arc::new(Mutex::new(InMemoryAuditSink::new(10)));
    let builder = PoolBuilder::from_config(&config())
        .unwrap()
        .resources([Resource::new("C").with_labels(["gpu"])])
        .audit(Box::new(Arc::clone(&sink)));
    assert_eq!(builder.pending().len(), 3);

    let gate = builder.build().unwrap();
    let item = QueueItem::new(1, "job");
    let admission = gate
        .admission
        .check(&item, Some(&Requirement::by_labels([("gpu", 2)])))
        .unwrap();
    assert!(admission.is_admitted());
    assert_eq!(gate.pool.free_count(), 1);

    assert_eq!(gate.release.release(1), vec!["A".to_string(), "C".to_string()]);
    assert_eq!(gate.pool.free_count(), 3);

    let actions: Vec<AuditAction> = sink.lock().events().iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Reserve, AuditAction::Release]);
}
