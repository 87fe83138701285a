//! Configuration-time validation of requirements against the pool.
//!
//! These checks look at the total pool, not at what is free right now: a
//! requirement that passes may still block at admission time, but it can
//! always be met eventually.

use std::collections::HashSet;

use crate::core::{
    parse_label_counts, ConfigError, LabelCount, PoolState, RequiredResources, Requirement,
    ResourcePool,
};
use crate::util::{fix_empty_and_trim, split_tokens};

/// Check that `requirement` is structurally satisfiable by `pool`.
///
/// By name: every name exists. By label: every label exists and is listed
/// once, every count is positive and no larger than the number of
/// resources carrying the label.
pub fn validate(requirement: &Requirement, pool: &ResourcePool) -> Result<(), ConfigError> {
    let state = pool.lock();
    match requirement {
        Requirement::ByName(names) => check_names_exist(&state, names),
        Requirement::ByLabel(pairs) => check_label_counts(&state, pairs),
    }
}

/// [`validate`] for a job property.
pub fn validate_required(
    required: &RequiredResources,
    pool: &ResourcePool,
) -> Result<(), ConfigError> {
    validate(&required.requirement, pool)
}

/// Field check: every whitespace-separated name exists in the pool.
pub fn check_resource_names(value: Option<&str>, pool: &ResourcePool) -> Result<(), ConfigError> {
    let Some(names) = fix_empty_and_trim(value) else {
        return Ok(());
    };
    check_names_exist(&pool.lock(), &split_tokens(names))
}

/// Field check: labels exist and are not combined with explicit names.
pub fn check_label_names(
    value: Option<&str>,
    resource_names: Option<&str>,
    pool: &ResourcePool,
) -> Result<(), ConfigError> {
    let Some(labels) = fix_empty_and_trim(value) else {
        return Ok(());
    };
    if fix_empty_and_trim(resource_names).is_some() {
        return Err(ConfigError::BothShapes);
    }
    let state = pool.lock();
    for label in labels.split_whitespace() {
        if !state.is_valid_label(label) {
            return Err(ConfigError::UnknownLabel(label.to_owned()));
        }
    }
    Ok(())
}

/// Field check for the per-label numbers.
///
/// With explicit names no number is allowed. With labels, one positive
/// integer per label is required and each must be satisfiable by the total
/// number of resources carrying that label.
pub fn check_resource_number(
    value: Option<&str>,
    resource_names: Option<&str>,
    label_names: Option<&str>,
    pool: &ResourcePool,
) -> Result<(), ConfigError> {
    let number = fix_empty_and_trim(value);
    if fix_empty_and_trim(resource_names).is_some() {
        return match number {
            Some(_) => Err(ConfigError::NumberWithNames),
            None => Ok(()),
        };
    }
    let Some(labels) = fix_empty_and_trim(label_names) else {
        return Ok(());
    };

    let pairs = parse_label_counts(labels, number)?;
    let state = pool.lock();
    for pair in &pairs {
        check_capacity(&state, pair)?;
    }
    Ok(())
}

fn check_names_exist(state: &PoolState, names: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    let unknown: Vec<String> = names
        .iter()
        .filter(|name| state.lookup_by_name(name).is_none() && seen.insert(name.as_str()))
        .cloned()
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::UnknownResources(unknown))
    }
}

fn check_label_counts(state: &PoolState, pairs: &[LabelCount]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for pair in pairs {
        if !seen.insert(pair.label.as_str()) {
            return Err(ConfigError::DuplicateLabel(pair.label.clone()));
        }
        if pair.count == 0 {
            return Err(ConfigError::ZeroCount(pair.label.clone()));
        }
        if !state.is_valid_label(&pair.label) {
            return Err(ConfigError::UnknownLabel(pair.label.clone()));
        }
        check_capacity(state, pair)?;
    }
    Ok(())
}

fn check_capacity(state: &PoolState, pair: &LabelCount) -> Result<(), ConfigError> {
    let available = state.lookup_by_label(&pair.label).len();
    if available < pair.count {
        return Err(ConfigError::InsufficientLabel {
            label: pair.label.clone(),
            available,
        });
    }
    Ok(())
}
