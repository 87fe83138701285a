//! API-facing request/response models.

use serde::{Deserialize, Serialize};

use crate::core::{Admission, AdmissionAdapter, QueueItem, ReleaseHook, Requirement, ResourcePool};
use crate::util::{ItemId, Params};

/// One admission poll from the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionRequest {
    /// Queued item identifier.
    pub item_id: ItemId,
    /// Job the item runs.
    pub job_name: String,
    /// Parameter constraints (matrix coordinates).
    #[serde(default)]
    pub params: Params,
    /// Multi-configuration parent flag.
    #[serde(default)]
    pub container: bool,
    /// What the job requires, if anything.
    #[serde(default)]
    pub requirement: Option<Requirement>,
}

/// Outcome of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionStatus {
    /// The item may start.
    Admitted,
    /// The item must wait.
    Blocked,
}

/// Admission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionResponse {
    /// Item identifier.
    pub item_id: ItemId,
    /// Decision.
    pub status: AdmissionStatus,
    /// Blocking reason for display, when blocked.
    pub reason: Option<String>,
    /// Reserved resources when admitted, awaited names or labels when blocked.
    pub resources: Vec<String>,
}

/// Release response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    /// Item identifier.
    pub item_id: ItemId,
    /// Names returned to the pool.
    pub released: Vec<String>,
}

/// Resource data for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Resource name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Labels, sorted.
    pub labels: Vec<String>,
    /// Current holder.
    pub reserved_by: Option<ItemId>,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Defined resources.
    pub resources: usize,
    /// Currently free resources.
    pub free: usize,
}

/// Run one admission poll. Errors are rendered for display.
pub fn check_admission(
    adapter: &AdmissionAdapter,
    req: AdmissionRequest,
) -> Result<AdmissionResponse, String> {
    let item = QueueItem {
        id: req.item_id,
        job_name: req.job_name,
        params: req.params,
        container: req.container,
    };
    let admission = adapter
        .check(&item, req.requirement.as_ref())
        .map_err(|e| e.to_string())?;

    Ok(match admission {
        Admission::Admitted(reservation) => AdmissionResponse {
            item_id: item.id,
            status: AdmissionStatus::Admitted,
            reason: None,
            resources: reservation.resources,
        },
        Admission::Blocked(reason) => AdmissionResponse {
            item_id: item.id,
            status: AdmissionStatus::Blocked,
            reason: Some(reason.to_string()),
            resources: reason.waiting_for(),
        },
    })
}

/// Release an item after its job finished.
pub fn release_item(hook: &ReleaseHook, item_id: ItemId) -> ReleaseResponse {
    ReleaseResponse {
        item_id,
        released: hook.release(item_id),
    }
}

/// Build resource listings from the pool.
pub fn list_resources(pool: &ResourcePool) -> Vec<ResourceSnapshot> {
    pool.snapshot()
        .into_iter()
        .map(|r| ResourceSnapshot {
            name: r.name,
            description: r.description,
            labels: r.labels.into_iter().collect(),
            reserved_by: r.reserved_by,
        })
        .collect()
}

/// Return a health payload.
pub fn health(pool: &ResourcePool) -> Health {
    let state = pool.lock();
    Health {
        ok: true,
        resources: state.resources().len(),
        free: state.free_count(),
    }
}
