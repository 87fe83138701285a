//! # Lockable Resources
//!
//! Admission gating of queued work items against a finite pool of named,
//! shared resources.
//!
//! A job describes what it needs either as an explicit list of resource names
//! or as one or more labels with a required count per label. An external
//! scheduler polls the admission check for each queued item until it is
//! admitted; the core decides atomically whether enough matching resources
//! are free, reserves all of them for the item or none, and otherwise reports
//! a blocking reason. When the job finishes the release hook returns the
//! resources to the pool.
//!
//! ## Key Properties
//!
//! - **All or nothing**: a requirement is reserved completely or not at all
//! - **Idempotent polling**: re-polling an admitted item returns its existing
//!   reservation, never a second one
//! - **Single authority**: one `parking_lot::Mutex` covers the whole
//!   read-decide-reserve sequence of an attempt
//! - **Never waits**: a short pool yields `Blocked` immediately; retrying is
//!   the scheduler's job
//!
//! ## Example
//!
//! ```rust
//! use lockable_resources::builders::PoolBuilder;
//! use lockable_resources::core::{Admission, QueueItem, Requirement, Resource};
//!
//! let gate = PoolBuilder::new()
//!     .resource(Resource::new("A").with_labels(["gpu"]))
//!     .resource(Resource::new("B").with_labels(["gpu"]))
//!     .build()
//!     .unwrap();
//!
//! let need = Requirement::by_labels([("gpu", 2)]);
//! let first = gate.admission.check(&QueueItem::new(1, "train"), Some(&need)).unwrap();
//! assert!(first.is_admitted());
//!
//! let second = gate.admission.check(&QueueItem::new(2, "eval"), Some(&need)).unwrap();
//! assert!(matches!(second, Admission::Blocked(_)));
//!
//! gate.release.release(1);
//! let retry = gate.admission.check(&QueueItem::new(2, "eval"), Some(&need)).unwrap();
//! assert!(retry.is_admitted());
//! ```
//!
//! For complete scenarios, see `tests/admission_algorithm_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Resource pool, allocation, admission and release.
pub mod core;
/// Configuration models for resource definitions.
pub mod config;
/// Builders to construct the pool and its components from configuration.
pub mod builders;
/// Scheduler-facing request/response models.
pub mod runtime;
/// Shared utilities.
pub mod util;
