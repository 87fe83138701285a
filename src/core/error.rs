//! Error types for validation and pool operations.

use thiserror::Error;

use crate::util::ItemId;

/// Configuration errors: a requirement that can never be satisfied as written.
///
/// These surface synchronously to whoever asked for validation and are never
/// retried. Messages are meant to be shown to the person editing the job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more named resources are not defined in the pool.
    #[error("The following resources do not exist: [{}]", .0.join(", "))]
    UnknownResources(Vec<String>),
    /// A requested label is carried by no resource in the pool.
    #[error("The label does not exist: {0}")]
    UnknownLabel(String),
    /// Both explicit names and labels were given.
    #[error("Only label or resources can be defined, not both.")]
    BothShapes,
    /// A number was given alongside explicit resource names.
    #[error("Remove number when using 'Resources'")]
    NumberWithNames,
    /// Labels were given without the per-label numbers.
    #[error("Please fill the number values")]
    MissingNumbers,
    /// A number could not be parsed.
    #[error("Could not parse the given value as integer: {0}")]
    InvalidNumber(String),
    /// The amount of numbers differs from the amount of labels.
    #[error("Given amount of numbers {numbers} is not equal to the amount of labels: {labels}.")]
    CountMismatch {
        /// Numbers supplied.
        numbers: usize,
        /// Labels supplied.
        labels: usize,
    },
    /// A per-label number was zero.
    #[error("0 is not a valid resource number (label: {0})")]
    ZeroCount(String),
    /// The same label appears more than once.
    #[error("Use each label only once (label: {0})")]
    DuplicateLabel(String),
    /// Fewer resources carry the label than requested, free or not.
    #[error("There are only {available} resources with the label: {label}")]
    InsufficientLabel {
        /// Requested label.
        label: String,
        /// Total resources carrying the label.
        available: usize,
    },
}

/// Errors produced by pool operations.
///
/// Everything except [`PoolError::Config`] is an internal contract violation:
/// the operation is aborted and pool state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// A name passed to a pool primitive is not defined.
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    /// Attempted to reserve a resource that another item holds.
    #[error("resource {resource} already reserved by item {holder}")]
    AlreadyReserved {
        /// Resource name.
        resource: String,
        /// Current holder.
        holder: ItemId,
    },
    /// The reservation record for an item disagrees with resource state.
    #[error("inconsistent reservation for item {item}: {detail}")]
    InconsistentReservation {
        /// Item whose record is inconsistent.
        item: ItemId,
        /// What went wrong.
        detail: String,
    },
    /// Pool configuration failed validation.
    #[error("config invalid: {0}")]
    InvalidConfig(String),
    /// Two resource definitions share a name.
    #[error("duplicate resource: {0}")]
    DuplicateResource(String),
    /// A configuration error detected at admission time.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
