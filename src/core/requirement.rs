//! Requirement shapes and the job-level property that carries them.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;
use crate::util::{fix_empty_and_trim, split_tokens};

/// A label together with the number of resources required to carry it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelCount {
    /// Label to match.
    pub label: String,
    /// How many distinct resources carrying the label are needed.
    pub count: usize,
}

impl LabelCount {
    /// Create a new pair.
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// What a queued item needs before it may run.
///
/// The two shapes are mutually exclusive. An empty requirement of either
/// shape gates nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Requirement {
    /// Every listed resource, by name.
    ByName(Vec<String>),
    /// `count` resources for each label, no resource counted twice.
    ByLabel(Vec<LabelCount>),
}

impl Requirement {
    /// Requirement on explicit resource names.
    pub fn by_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ByName(names.into_iter().map(Into::into).collect())
    }

    /// Requirement on `(label, count)` pairs.
    pub fn by_labels<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        Self::ByLabel(
            pairs
                .into_iter()
                .map(|(label, count)| LabelCount::new(label, count))
                .collect(),
        )
    }

    /// True when admission needs no resources at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::ByName(names) => names.is_empty(),
            Self::ByLabel(pairs) => pairs.iter().all(|p| p.count == 0),
        }
    }

    /// Total number of resources a successful admission reserves.
    pub fn total_count(&self) -> usize {
        match self {
            Self::ByName(names) => names.len(),
            Self::ByLabel(pairs) => pairs.iter().map(|p| p.count).sum(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(names) => write!(f, "[{}]", names.join(", ")),
            Self::ByLabel(pairs) => {
                let labels: Vec<&str> = pairs.iter().map(|p| p.label.as_str()).collect();
                write!(f, "{}", labels.join(" "))
            }
        }
    }
}

/// The resource requirement attached to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredResources {
    /// What to reserve.
    pub requirement: Requirement,
    /// Variable under which the reserved names are exported to the job.
    #[serde(default)]
    pub names_var: Option<String>,
}

impl RequiredResources {
    /// Wrap a requirement without a names variable.
    pub const fn new(requirement: Requirement) -> Self {
        Self {
            requirement,
            names_var: None,
        }
    }

    /// Parse the free-text job configuration fields.
    ///
    /// Each field is whitespace separated; blank fields count as absent.
    /// Returns `Ok(None)` when neither names nor labels are given.
    pub fn from_fields(
        resource_names: Option<&str>,
        names_var: Option<&str>,
        resource_number: Option<&str>,
        label_name: Option<&str>,
    ) -> Result<Option<Self>, ConfigError> {
        let names = fix_empty_and_trim(resource_names);
        let labels = fix_empty_and_trim(label_name);
        let number = fix_empty_and_trim(resource_number);
        let names_var = fix_empty_and_trim(names_var).map(str::to_owned);

        let requirement = match (names, labels) {
            (None, None) => return Ok(None),
            (Some(_), Some(_)) => return Err(ConfigError::BothShapes),
            (Some(names), None) => {
                if number.is_some() {
                    return Err(ConfigError::NumberWithNames);
                }
                Requirement::ByName(split_tokens(names))
            }
            (None, Some(labels)) => Requirement::ByLabel(parse_label_counts(labels, number)?),
        };

        Ok(Some(Self {
            requirement,
            names_var,
        }))
    }
}

/// Pair whitespace-separated labels with whitespace-separated counts.
///
/// Rejects missing, unparsable or zero counts, a count/label length
/// mismatch, and labels listed twice.
pub fn parse_label_counts(
    labels: &str,
    numbers: Option<&str>,
) -> Result<Vec<LabelCount>, ConfigError> {
    let labels = split_tokens(labels);
    let numbers = split_tokens(fix_empty_and_trim(numbers).ok_or(ConfigError::MissingNumbers)?);

    if labels.len() != numbers.len() {
        return Err(ConfigError::CountMismatch {
            numbers: numbers.len(),
            labels: labels.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut pairs = Vec::with_capacity(labels.len());
    for (label, number) in labels.into_iter().zip(numbers) {
        let count: usize = number
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(number.clone()))?;
        if count == 0 {
            return Err(ConfigError::ZeroCount(label));
        }
        if !seen.insert(label.clone()) {
            return Err(ConfigError::DuplicateLabel(label));
        }
        pairs.push(LabelCount { label, count });
    }
    Ok(pairs)
}
