//! Selection of concrete resources for a requirement.
//!
//! The allocator only reads pool state. It runs under the caller's pool
//! guard and returns either a complete selection or the reason none exists;
//! reserving the selection is the caller's next step under the same guard.

use std::collections::HashSet;

use crate::core::{ConfigError, LabelCount, PoolState, Requirement, Resource};
use crate::util::{ItemId, Params};

/// Why a requirement cannot be met right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortage {
    /// Named resources currently held by other items.
    Busy(Vec<(String, ItemId)>),
    /// The first label that did not have enough free candidates.
    Label {
        /// Label that came up short.
        label: String,
        /// Resources needed for it.
        needed: usize,
        /// Free candidates found for it.
        free: usize,
    },
}

/// Outcome of one selection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// Every required resource, in selection order.
    Selected(Vec<String>),
    /// Not enough free resources; try again later.
    Unavailable(Shortage),
}

/// Greedy selector over one locked pool snapshot.
pub struct Allocator<'a> {
    state: &'a PoolState,
    params: &'a Params,
}

impl<'a> Allocator<'a> {
    /// Selector over `state`, restricting label candidates to resources
    /// whose attributes match every entry of `params`.
    pub const fn new(state: &'a PoolState, params: &'a Params) -> Self {
        Self { state, params }
    }

    /// Choose resources for `requirement`, all or nothing.
    ///
    /// Only an unknown explicit name is an error; shortages are
    /// [`Allocation::Unavailable`].
    pub fn select(&self, requirement: &Requirement) -> Result<Allocation, ConfigError> {
        match requirement {
            Requirement::ByName(names) => self.select_by_name(names),
            Requirement::ByLabel(pairs) => Ok(self.select_by_label(pairs)),
        }
    }

    fn select_by_name(&self, names: &[String]) -> Result<Allocation, ConfigError> {
        let mut seen = HashSet::with_capacity(names.len());
        let mut unknown = Vec::new();
        let mut busy = Vec::new();
        let mut selected = Vec::with_capacity(names.len());

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match self.state.lookup_by_name(name) {
                None => unknown.push(name.clone()),
                Some(Resource {
                    reserved_by: Some(holder),
                    ..
                }) => busy.push((name.clone(), *holder)),
                Some(_) => selected.push(name.clone()),
            }
        }

        if !unknown.is_empty() {
            return Err(ConfigError::UnknownResources(unknown));
        }
        if !busy.is_empty() {
            return Ok(Allocation::Unavailable(Shortage::Busy(busy)));
        }
        Ok(Allocation::Selected(selected))
    }

    fn select_by_label(&self, pairs: &[LabelCount]) -> Allocation {
        let mut taken: HashSet<&str> = HashSet::new();
        let mut selected = Vec::new();

        for pair in pairs.iter().filter(|p| p.count > 0) {
            let candidates: Vec<&Resource> = self
                .state
                .resources()
                .iter()
                .filter(|r| {
                    r.is_free()
                        && r.has_label(&pair.label)
                        && r.satisfies(self.params)
                        && !taken.contains(r.name.as_str())
                })
                .collect();

            if candidates.len() < pair.count {
                return Allocation::Unavailable(Shortage::Label {
                    label: pair.label.clone(),
                    needed: pair.count,
                    free: candidates.len(),
                });
            }

            for resource in candidates.into_iter().take(pair.count) {
                taken.insert(resource.name.as_str());
                selected.push(resource.name.clone());
            }
        }

        Allocation::Selected(selected)
    }
}
