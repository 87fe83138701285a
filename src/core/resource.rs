//! The lockable resource entity.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::util::{ItemId, Params};

/// A named unit of shared capacity that one queued item can hold at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique name, the primary key across the pool.
    pub name: String,
    /// Free-text description for diagnostics.
    #[serde(default)]
    pub description: String,
    /// Labels used for matching.
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Attributes that parameter constraints are matched against.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Item currently holding the resource, `None` when free.
    #[serde(default)]
    pub reserved_by: Option<ItemId>,
}

impl Resource {
    /// Create a free resource without labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            labels: BTreeSet::new(),
            attributes: BTreeMap::new(),
            reserved_by: None,
        }
    }

    /// Add labels.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// True iff nobody holds the resource.
    pub const fn is_free(&self) -> bool {
        self.reserved_by.is_none()
    }

    /// True iff the resource carries `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// True iff every parameter is matched by an equal attribute.
    pub fn satisfies(&self, params: &Params) -> bool {
        params
            .iter()
            .all(|(key, value)| self.attributes.get(key) == Some(value))
    }
}
