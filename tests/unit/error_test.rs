//! Tests for error types

use lockable_resources::core::{ConfigError, PoolError};

#[test]
fn test_unknown_resources_error() {
    let err = ConfigError::UnknownResources(vec!["A".to_string(), "B".to_string()]);
    assert_eq!(
        format!("{}", err),
        "The following resources do not exist: [A, B]"
    );
}

#[test]
fn test_both_shapes_error() {
    let err = ConfigError::BothShapes;
    assert_eq!(
        format!("{}", err),
        "Only label or resources can be defined, not both."
    );
}

#[test]
fn test_count_mismatch_error() {
    let err = ConfigError::CountMismatch {
        numbers: 1,
        labels: 2,
    };
    assert_eq!(
        format!("{}", err),
        "Given amount of numbers 1 is not equal to the amount of labels: 2."
    );
}

#[test]
fn test_insufficient_label_error() {
    let err = ConfigError::InsufficientLabel {
        label: "gpu".to_string(),
        available: 3,
    };
    assert_eq!(
        format!("{}", err),
        "There are only 3 resources with the label: gpu"
    );
}

#[test]
fn test_already_reserved_error() {
    let err = PoolError::AlreadyReserved {
        resource: "A".to_string(),
        holder: 7,
    };
    assert_eq!(format!("{}", err), "resource A already reserved by item 7");
}

#[test]
fn test_config_error_is_transparent() {
    let err: PoolError = ConfigError::UnknownLabel("tpu".to_string()).into();
    assert_eq!(format!("{}", err), "The label does not exist: tpu");
}
