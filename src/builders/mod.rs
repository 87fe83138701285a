//! Builders to construct the pool and its admission/release components.

pub mod pool_builder;

pub use pool_builder::{build_pool, Gate, PoolBuilder};
