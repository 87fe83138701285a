//! Scheduler-facing API surface.

pub mod api;

pub use api::{
    check_admission, health, list_resources, release_item, AdmissionRequest, AdmissionResponse,
    AdmissionStatus, Health, ReleaseResponse, ResourceSnapshot,
};
