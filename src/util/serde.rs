//! Identifier and parameter types shared across the crate.

use std::collections::BTreeMap;

/// Opaque identifier of a queued item, stable for the item's lifetime in the queue.
pub type ItemId = u64;

/// Caller-supplied key/value constraints, e.g. the axis values of a matrix sub-build.
pub type Params = BTreeMap<String, String>;

/// Trim a free-text field and treat blank input as absent.
pub fn fix_empty_and_trim(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Split a whitespace-separated field into owned tokens.
pub fn split_tokens(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_owned).collect()
}

/// Build a [`Params`] map from key/value pairs.
pub fn params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Params
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
