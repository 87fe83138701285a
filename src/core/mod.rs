//! Resource pool, allocation, admission and release.

pub mod admission;
pub mod allocator;
pub mod audit;
pub mod error;
pub mod release;
pub mod requirement;
pub mod resource;
pub mod resource_pool;
pub mod validation;

pub use admission::{Admission, AdmissionAdapter, BlockingReason, QueueItem};
pub use allocator::{Allocation, Allocator, Shortage};
pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, SharedAuditSink,
};
pub use error::{AppResult, ConfigError, PoolError};
pub use release::ReleaseHook;
pub use requirement::{parse_label_counts, LabelCount, RequiredResources, Requirement};
pub use resource::Resource;
pub use resource_pool::{PoolState, Reservation, ResourcePool};
pub use validation::{
    check_label_names, check_resource_names, check_resource_number, validate, validate_required,
};
