//! Resource pool: the single authority over resource state and reservations.

use std::collections::{BTreeSet, HashMap, HashSet};

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use crate::core::{PoolError, Resource};
use crate::util::ItemId;

/// The set of resource names held on behalf of one queued item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Holder.
    pub item: ItemId,
    /// Reserved resource names, in selection order.
    pub resources: Vec<String>,
}

impl Reservation {
    /// A reservation that holds nothing.
    pub const fn empty(item: ItemId) -> Self {
        Self {
            item,
            resources: Vec::new(),
        }
    }

    /// True when nothing is held.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// True when `name` is part of the reservation.
    pub fn contains(&self, name: &str) -> bool {
        self.resources.iter().any(|r| r == name)
    }

    /// The `(variable, value)` pair exporting the reserved names to a job,
    /// names separated by single spaces.
    pub fn export(&self, var: &str) -> (String, String) {
        (var.to_owned(), self.resources.join(" "))
    }
}

/// Pool contents, only reachable through the pool lock.
///
/// Everything an allocation attempt reads and writes lives here, so one
/// guard covers the whole read-decide-reserve sequence.
#[derive(Debug, Default)]
pub struct PoolState {
    resources: Vec<Resource>,
    index: HashMap<String, usize>,
    reservations: HashMap<ItemId, Reservation>,
}

impl PoolState {
    fn from_resources(resources: impl IntoIterator<Item = Resource>) -> Result<Self, PoolError> {
        let mut state = Self::default();
        for resource in resources {
            if state.index.contains_key(&resource.name) {
                return Err(PoolError::DuplicateResource(resource.name));
            }
            if let Some(item) = resource.reserved_by {
                state
                    .reservations
                    .entry(item)
                    .or_insert_with(|| Reservation::empty(item))
                    .resources
                    .push(resource.name.clone());
            }
            state
                .index
                .insert(resource.name.clone(), state.resources.len());
            state.resources.push(resource);
        }
        Ok(state)
    }

    /// All resources in pool order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Resource by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<&Resource> {
        self.index.get(name).map(|&i| &self.resources[i])
    }

    /// Resources carrying `label`, in pool order.
    pub fn lookup_by_label(&self, label: &str) -> Vec<&Resource> {
        self.resources.iter().filter(|r| r.has_label(label)).collect()
    }

    /// True iff `name` exists and nobody holds it.
    pub fn is_free(&self, name: &str) -> bool {
        self.lookup_by_name(name).is_some_and(Resource::is_free)
    }

    /// Number of free resources.
    pub fn free_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_free()).count()
    }

    /// Distinct labels across the pool, sorted.
    pub fn all_labels(&self) -> BTreeSet<&str> {
        self.resources
            .iter()
            .flat_map(|r| r.labels.iter().map(String::as_str))
            .collect()
    }

    /// True iff at least one resource carries `label`.
    pub fn is_valid_label(&self, label: &str) -> bool {
        self.resources.iter().any(|r| r.has_label(label))
    }

    /// Current reservation of `item`.
    pub fn reservation(&self, item: ItemId) -> Option<&Reservation> {
        self.reservations.get(&item)
    }

    /// Number of items currently holding a reservation.
    pub fn reservation_count(&self) -> usize {
        self.reservations.len()
    }

    /// Reserve every named resource for `item`.
    ///
    /// All preconditions are checked before anything is written: every name
    /// exists, is listed once and is free, and `item` holds nothing yet.
    /// An empty `names` is rejected; empty reservations are never recorded.
    pub fn reserve_all(&mut self, names: &[String], item: ItemId) -> Result<&Reservation, PoolError> {
        if names.is_empty() {
            return Err(PoolError::InconsistentReservation {
                item,
                detail: "no resources to reserve".into(),
            });
        }
        if self.reservations.contains_key(&item) {
            return Err(PoolError::InconsistentReservation {
                item,
                detail: "item already holds a reservation".into(),
            });
        }

        let mut slots = Vec::with_capacity(names.len());
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            let slot = *self
                .index
                .get(name)
                .ok_or_else(|| PoolError::UnknownResource(name.clone()))?;
            if !seen.insert(slot) {
                return Err(PoolError::InconsistentReservation {
                    item,
                    detail: format!("resource {name} requested twice"),
                });
            }
            if let Some(holder) = self.resources[slot].reserved_by {
                return Err(PoolError::AlreadyReserved {
                    resource: name.clone(),
                    holder,
                });
            }
            slots.push(slot);
        }

        for slot in slots {
            self.resources[slot].reserved_by = Some(item);
        }
        tracing::info!(item, resources = ?names, "reserved resources");

        self.reservations.insert(
            item,
            Reservation {
                item,
                resources: names.to_vec(),
            },
        );
        Ok(&self.reservations[&item])
    }

    /// Release everything `item` holds and drop its record.
    ///
    /// Returns `Ok(None)` when the item held nothing. A record naming a
    /// resource the item does not hold aborts without touching the pool.
    pub fn release_all(&mut self, item: ItemId) -> Result<Option<Reservation>, PoolError> {
        let Some(reservation) = self.reservations.get(&item) else {
            return Ok(None);
        };

        let mut slots = Vec::with_capacity(reservation.resources.len());
        for name in &reservation.resources {
            let Some(&slot) = self.index.get(name) else {
                return Err(PoolError::InconsistentReservation {
                    item,
                    detail: format!("recorded resource {name} is not in the pool"),
                });
            };
            if self.resources[slot].reserved_by != Some(item) {
                return Err(PoolError::InconsistentReservation {
                    item,
                    detail: format!(
                        "recorded resource {name} is held by {:?}",
                        self.resources[slot].reserved_by
                    ),
                });
            }
            slots.push(slot);
        }

        for slot in slots {
            self.resources[slot].reserved_by = None;
        }
        let released = self.reservations.remove(&item);
        tracing::info!(item, resources = ?released.as_ref().map(|r| &r.resources), "released resources");
        Ok(released)
    }

    /// Swap in a new resource set, carrying over reservations of names that survive.
    fn replace(&mut self, resources: Vec<Resource>) -> Result<(), PoolError> {
        let mut next = Self::from_resources(resources.into_iter().map(|mut r| {
            r.reserved_by = None;
            r
        }))?;

        for (item, reservation) in self.reservations.drain() {
            let kept: Vec<String> = reservation
                .resources
                .into_iter()
                .filter(|name| next.index.contains_key(name))
                .collect();
            if kept.is_empty() {
                tracing::warn!(item, "reservation dropped: no reserved resource survived redefinition");
                continue;
            }
            for name in &kept {
                let slot = next.index[name];
                next.resources[slot].reserved_by = Some(item);
            }
            next.reservations.insert(
                item,
                Reservation {
                    item,
                    resources: kept,
                },
            );
        }

        *self = next;
        Ok(())
    }
}

/// Owns every resource and every reservation record.
///
/// All reads and writes go through one `parking_lot::Mutex`; callers that
/// must decide and reserve atomically take the guard with [`ResourcePool::lock`].
#[derive(Debug, Default)]
pub struct ResourcePool {
    state: Mutex<PoolState>,
}

impl ResourcePool {
    /// Build a pool from resource definitions in iteration order.
    ///
    /// Resources that arrive already held rebuild their reservation records.
    pub fn new(resources: impl IntoIterator<Item = Resource>) -> Result<Self, PoolError> {
        Ok(Self {
            state: Mutex::new(PoolState::from_resources(resources)?),
        })
    }

    /// Take the pool lock. Keep the guard only for one operation.
    pub fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock()
    }

    /// Resource by name.
    pub fn lookup_by_name(&self, name: &str) -> Option<Resource> {
        self.lock().lookup_by_name(name).cloned()
    }

    /// Resources carrying `label`, in pool order.
    pub fn lookup_by_label(&self, label: &str) -> Vec<Resource> {
        self.lock()
            .lookup_by_label(label)
            .into_iter()
            .cloned()
            .collect()
    }

    /// True iff `name` exists and is free.
    pub fn is_free(&self, name: &str) -> bool {
        self.lock().is_free(name)
    }

    /// See [`PoolState::reserve_all`].
    pub fn reserve_all(&self, names: &[String], item: ItemId) -> Result<Reservation, PoolError> {
        self.lock().reserve_all(names, item).cloned()
    }

    /// See [`PoolState::release_all`].
    pub fn release_all(&self, item: ItemId) -> Result<Option<Reservation>, PoolError> {
        self.lock().release_all(item)
    }

    /// Current reservation of `item`.
    pub fn reservation(&self, item: ItemId) -> Option<Reservation> {
        self.lock().reservation(item).cloned()
    }

    /// Number of free resources.
    pub fn free_count(&self) -> usize {
        self.lock().free_count()
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.lock().resources().len()
    }

    /// True when the pool defines no resources.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resource names in pool order.
    pub fn names(&self) -> Vec<String> {
        self.lock()
            .resources()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    /// Distinct labels, sorted.
    pub fn all_labels(&self) -> Vec<String> {
        self.lock()
            .all_labels()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// True iff at least one resource carries `label`.
    pub fn is_valid_label(&self, label: &str) -> bool {
        self.lock().is_valid_label(label)
    }

    /// Cloned copy of every resource with its current holder.
    pub fn snapshot(&self) -> Vec<Resource> {
        self.lock().resources().to_vec()
    }

    /// Replace the resource set after an external redefinition.
    ///
    /// Reservations keep the names that still exist; a reservation with no
    /// surviving name is dropped. Holders on the incoming definitions are
    /// ignored. On a duplicate name the pool is left unchanged.
    pub fn replace(&self, resources: Vec<Resource>) -> Result<(), PoolError> {
        let mut state = self.lock();
        state.replace(resources)?;
        tracing::info!(
            resources = state.resources().len(),
            reservations = state.reservation_count(),
            "resource pool redefined"
        );
        Ok(())
    }
}
