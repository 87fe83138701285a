//! Per-poll admission entry point for the external scheduler.
//!
//! The scheduler calls [`AdmissionAdapter::check`] for a queued item until it
//! is admitted. Checks never wait: when resources are short the item is
//! reported as blocked and the scheduler polls again later. Once admitted, an
//! item keeps its reservation across further polls until it is released.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{
    build_audit_event, Allocation, Allocator, AuditAction, AuditSink, PoolError, Requirement,
    Reservation, ResourcePool, SharedAuditSink, Shortage,
};
use crate::util::{ItemId, Params};

/// A queued item as seen by the admission check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Identifier, stable while the item is queued.
    pub id: ItemId,
    /// Job the item will run.
    pub job_name: String,
    /// Key/value constraints on label candidates (e.g. matrix axis values).
    #[serde(default)]
    pub params: Params,
    /// Multi-configuration parent; only its children lock resources.
    #[serde(default)]
    pub container: bool,
}

impl QueueItem {
    /// Regular item without parameters.
    pub fn new(id: ItemId, job_name: impl Into<String>) -> Self {
        Self {
            id,
            job_name: job_name.into(),
            params: Params::new(),
            container: false,
        }
    }

    /// Attach parameter constraints.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Mark the item as a multi-configuration parent.
    #[must_use]
    pub const fn as_container(mut self) -> Self {
        self.container = true;
        self
    }
}

/// What a blocked item is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingReason {
    /// The requirement that could not be met.
    pub requirement: Requirement,
    /// What was missing on this poll.
    pub shortage: Shortage,
}

impl BlockingReason {
    /// Names of busy resources, or the label that came up short.
    pub fn waiting_for(&self) -> Vec<String> {
        match &self.shortage {
            Shortage::Busy(busy) => busy.iter().map(|(name, _)| name.clone()).collect(),
            Shortage::Label { label, .. } => vec![label.clone()],
        }
    }
}

impl fmt::Display for BlockingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.requirement {
            Requirement::ByName(_) => write!(f, "Waiting for resources {}", self.requirement),
            Requirement::ByLabel(_) => {
                write!(f, "Waiting for resources with label {}", self.requirement)
            }
        }
    }
}

/// Admission decision for one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The item may run; it holds this reservation until released.
    Admitted(Reservation),
    /// The item must wait; poll again later.
    Blocked(BlockingReason),
}

impl Admission {
    /// True when the item may run.
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }

    /// The reservation, when admitted.
    pub const fn reservation(&self) -> Option<&Reservation> {
        match self {
            Self::Admitted(reservation) => Some(reservation),
            Self::Blocked(_) => None,
        }
    }

    /// The blocking reason, when blocked.
    pub const fn blocking_reason(&self) -> Option<&BlockingReason> {
        match self {
            Self::Admitted(_) => None,
            Self::Blocked(reason) => Some(reason),
        }
    }
}

/// Idempotent admission check over a shared pool.
pub struct AdmissionAdapter {
    pool: Arc<ResourcePool>,
    audit: Option<SharedAuditSink>,
    last_shortage: Mutex<HashMap<ItemId, Shortage>>,
}

impl AdmissionAdapter {
    /// Adapter over `pool`.
    pub fn new(pool: Arc<ResourcePool>) -> Self {
        Self {
            pool,
            audit: None,
            last_shortage: Mutex::new(HashMap::new()),
        }
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

    /// The pool this adapter admits against.
    pub const fn pool(&self) -> &Arc<ResourcePool> {
        &self.pool
    }

    /// Decide whether `item` may run now.
    ///
    /// An item that already holds a reservation gets it back unchanged,
    /// whatever requirement it is polled with. Otherwise container items and
    /// items without a (non-empty) requirement are admitted with an empty
    /// reservation and nothing is recorded. Everything else goes through the
    /// allocator and, on success, its selection is reserved in the same
    /// critical section. Blocking never mutates the pool.
    ///
    /// Errors are configuration errors found at run time (an unknown
    /// resource name) or pool invariant violations.
    pub fn check(
        &self,
        item: &QueueItem,
        requirement: Option<&Requirement>,
    ) -> Result<Admission, PoolError> {
        let mut state = self.pool.lock();
        if let Some(existing) = state.reservation(item.id) {
            tracing::debug!(item = item.id, job = %item.job_name, "already admitted");
            return Ok(Admission::Admitted(existing.clone()));
        }
        if item.container {
            tracing::trace!(item = item.id, job = %item.job_name, "container item not gated");
            return Ok(Admission::Admitted(Reservation::empty(item.id)));
        }
        let Some(requirement) = requirement.filter(|r| !r.is_empty()) else {
            return Ok(Admission::Admitted(Reservation::empty(item.id)));
        };

        let allocation = Allocator::new(&state, &item.params)
            .select(requirement)
            .inspect_err(|error| {
                tracing::warn!(item = item.id, job = %item.job_name, %error, "requirement cannot be met");
            })?;

        match allocation {
            Allocation::Selected(names) => {
                let reservation = state.reserve_all(&names, item.id)?.clone();
                drop(state);
                self.last_shortage.lock().remove(&item.id);
                tracing::info!(
                    "{} reserved resources {:?}",
                    item.job_name,
                    reservation.resources
                );
                self.record(item, AuditAction::Reserve, reservation.resources.clone(), None);
                Ok(Admission::Admitted(reservation))
            }
            Allocation::Unavailable(shortage) => {
                drop(state);
                let reason = BlockingReason {
                    requirement: requirement.clone(),
                    shortage,
                };
                tracing::debug!("{} waiting for resources: {}", item.job_name, reason);
                if self.shortage_changed(item.id, &reason.shortage) {
                    self.record(
                        item,
                        AuditAction::Block,
                        reason.waiting_for(),
                        Some(reason.to_string()),
                    );
                }
                Ok(Admission::Blocked(reason))
            }
        }
    }

    /// Drop the blocking state kept for an item that left the queue without
    /// being admitted.
    pub fn forget(&self, item: ItemId) {
        self.last_shortage.lock().remove(&item);
    }

    fn shortage_changed(&self, item: ItemId, shortage: &Shortage) -> bool {
        let mut last = self.last_shortage.lock();
        if last.get(&item) == Some(shortage) {
            return false;
        }
        last.insert(item, shortage.clone());
        true
    }

    fn record(
        &self,
        item: &QueueItem,
        action: AuditAction,
        resources: Vec<String>,
        detail: Option<String>,
    ) {
        if let Some(audit) = &self.audit {
            audit.lock().record(build_audit_event(
                item.id,
                Some(&item.job_name),
                action,
                resources,
                detail,
            ));
        }
    }
}
