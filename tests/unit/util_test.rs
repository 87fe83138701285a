//! Tests for utility functions

use lockable_resources::util::{fix_empty_and_trim, now_ms, params, split_tokens};

#[test]
fn test_fix_empty_and_trim() {
    assert_eq!(fix_empty_and_trim(None), None);
    assert_eq!(fix_empty_and_trim(Some("")), None);
    assert_eq!(fix_empty_and_trim(Some("   ")), None);
    assert_eq!(fix_empty_and_trim(Some("  a b ")), Some("a b"));
}

#[test]
fn test_split_tokens() {
    assert_eq!(
        split_tokens(" A\tB  C\n"),
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    );
    assert!(split_tokens("   ").is_empty());
}

#[test]
fn test_params() {
    let p = params([("os", "linux"), ("jdk", "17")]);
    assert_eq!(p.len(), 2);
    assert_eq!(p.get("os").map(String::as_str), Some("linux"));
}

#[test]
fn test_now_ms() {
    assert!(now_ms() > 0);
}
