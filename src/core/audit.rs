//! Audit sink implementations.
//!
//! Keeps a bounded trail of admission and release decisions for scheduler
//! diagnostics.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::util::clock::now_ms;
use crate::util::ItemId;

/// What happened to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// Resources were reserved for the item.
    Reserve,
    /// The item was polled and had to wait.
    Block,
    /// The item's resources were returned to the pool.
    Release,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Reserve => "reserve",
            Self::Block => "block",
            Self::Release => "release",
        };
        f.write_str(s)
    }
}

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Unique event identifier (UUID v4).
    pub event_id: String,
    /// Queued item the event concerns.
    pub item: ItemId,
    /// Job the item belongs to, if known.
    pub job: Option<String>,
    /// Action taken.
    pub action: AuditAction,
    /// Resources involved (reserved, waited for, or released).
    pub resources: Vec<String>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context, e.g. the blocking reason.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// Sink handle shared between the admission adapter and the release hook.
pub type SharedAuditSink = Arc<Mutex<Box<dyn AuditSink>>>;

/// Lets a caller keep a handle on a sink it hands to the pool components.
impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    item: ItemId,
    job: Option<&str>,
    action: AuditAction,
    resources: Vec<String>,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: Uuid::new_v4().to_string(),
        item,
        job: job.map(str::to_owned),
        action,
        resources,
        created_at_ms: now_ms(),
        detail,
    }
}
