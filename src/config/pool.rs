//! Resource pool configuration structures.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, Resource};

/// Environment variable holding the path of the pool configuration file.
pub const CONFIG_ENV: &str = "LOCKABLE_RESOURCES_CONFIG";

/// Definition of one lockable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Unique resource name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Labels the resource carries.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Attributes matched against item parameters.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ResourceConfig {
    /// Validate a single definition.
    ///
    /// Names and labels end up in whitespace-separated job fields, so they
    /// must be non-empty and contain no whitespace.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("resource name must not be empty".into());
        }
        if self.name.contains(char::is_whitespace) {
            return Err(format!("resource name `{}` contains whitespace", self.name));
        }
        for label in &self.labels {
            if label.is_empty() || label.contains(char::is_whitespace) {
                return Err(format!(
                    "resource `{}` has invalid label `{label}`",
                    self.name
                ));
            }
        }
        Ok(())
    }

    /// The free resource this definition describes.
    pub fn to_resource(&self) -> Resource {
        let mut resource = Resource::new(self.name.clone())
            .with_description(self.description.clone())
            .with_labels(self.labels.iter().cloned());
        resource.attributes.clone_from(&self.attributes);
        resource
    }
}

/// Root pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Resource definitions in pool order.
    pub resources: Vec<ResourceConfig>,
}

impl PoolConfig {
    /// Validate all definitions and ensure names are unique.
    pub fn validate(&self) -> Result<(), String> {
        if self.resources.is_empty() {
            return Err("at least one resource must be defined".into());
        }
        let mut names = HashSet::new();
        for resource in &self.resources {
            resource.validate()?;
            if !names.insert(resource.name.as_str()) {
                return Err(format!("resource `{}` defined twice", resource.name));
            }
        }
        Ok(())
    }

    /// Parse pool configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading resource configuration {}", path.display()))?;
        Self::from_json_str(&text)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading resource configuration {}", path.display()))
    }

    /// Load the file named by [`CONFIG_ENV`], reading `.env` first if present.
    pub fn from_env() -> AppResult<Self> {
        if let Err(error) = dotenvy::dotenv() {
            tracing::debug!(%error, "no .env file loaded");
        }
        let path = std::env::var(CONFIG_ENV).with_context(|| format!("{CONFIG_ENV} is not set"))?;
        Self::from_path(path)
    }

    /// Free resources in definition order.
    pub fn to_resources(&self) -> Vec<Resource> {
        self.resources.iter().map(ResourceConfig::to_resource).collect()
    }
}
