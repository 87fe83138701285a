//! Configuration models for resource definitions.

pub mod pool;

pub use pool::{PoolConfig, ResourceConfig, CONFIG_ENV};
