//! Release of an item's reservation when its job finishes.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{build_audit_event, AuditAction, AuditSink, ResourcePool, SharedAuditSink};
use crate::util::ItemId;

/// Returns reserved resources to the pool once the owning job reaches a
/// terminal state (success, failure or abort).
pub struct ReleaseHook {
    pool: Arc<ResourcePool>,
    audit: Option<SharedAuditSink>,
}

impl ReleaseHook {
    /// Hook over `pool`.
    pub const fn new(pool: Arc<ResourcePool>) -> Self {
        Self { pool, audit: None }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Attach an audit sink shared with other components.
    #[must_use]
    pub fn with_shared_audit(mut self, audit: SharedAuditSink) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Release whatever `item` holds and return the freed names.
    ///
    /// Never fails: an item that holds nothing is a no-op, and an
    /// inconsistent reservation record is logged and left untouched.
    pub fn release(&self, item: ItemId) -> Vec<String> {
        match self.pool.release_all(item) {
            Ok(Some(reservation)) => {
                if let Some(audit) = &self.audit {
                    audit.lock().record(build_audit_event(
                        item,
                        None,
                        AuditAction::Release,
                        reservation.resources.clone(),
                        None,
                    ));
                }
                reservation.resources
            }
            Ok(None) => {
                tracing::debug!(item, "nothing to release");
                Vec::new()
            }
            Err(error) => {
                tracing::error!(item, %error, "release aborted, pool left unchanged");
                Vec::new()
            }
        }
    }
}
