//! Builders to construct resource pools from configuration.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::PoolConfig;
use crate::core::{
    AdmissionAdapter, AuditSink, PoolError, ReleaseHook, Resource, ResourcePool, SharedAuditSink,
};

/// Build a resource pool from validated configuration.
pub fn build_pool(cfg: &PoolConfig) -> Result<ResourcePool, PoolError> {
    cfg.validate().map_err(PoolError::InvalidConfig)?;
    let pool = ResourcePool::new(cfg.to_resources())?;
    tracing::info!("built resource pool with {} resources", cfg.resources.len());
    Ok(pool)
}

/// A pool together with the admission adapter and release hook sharing it.
pub struct Gate {
    /// The shared pool.
    pub pool: Arc<ResourcePool>,
    /// Per-poll admission entry point.
    pub admission: AdmissionAdapter,
    /// Completion hook.
    pub release: ReleaseHook,
}

/// Fluent builder for a [`Gate`].
#[derive(Default)]
pub struct PoolBuilder {
    resources: Vec<Resource>,
    audit: Option<SharedAuditSink>,
}

impl PoolBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded with every resource of `cfg`, after validating it.
    pub fn from_config(cfg: &PoolConfig) -> Result<Self, PoolError> {
        cfg.validate().map_err(PoolError::InvalidConfig)?;
        Ok(Self {
            resources: cfg.to_resources(),
            audit: None,
        })
    }

    /// Add a resource.
    #[must_use]
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Add several resources.
    #[must_use]
    pub fn resources(mut self, resources: impl IntoIterator<Item = Resource>) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Audit sink shared by the admission adapter and the release hook.
    #[must_use]
    pub fn audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Resources added so far.
    pub fn pending(&self) -> &[Resource] {
        &self.resources
    }

    /// Build the pool and wire both components to it.
    pub fn build(self) -> Result<Gate, PoolError> {
        let pool = Arc::new(ResourcePool::new(self.resources)?);
        let mut admission = AdmissionAdapter::new(Arc::clone(&pool));
        let mut release = ReleaseHook::new(Arc::clone(&pool));
        if let Some(audit) = self.audit {
            admission = admission.with_shared_audit(Arc::clone(&audit));
            release = release.with_shared_audit(audit);
        }
        Ok(Gate {
            pool,
            admission,
            release,
        })
    }
}
