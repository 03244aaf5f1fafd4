//! Tests for AnyValue and Attributes

use crate::{AnyValue, Attributes};

// =============================================================================
// AnyValue tests
// =============================================================================

#[test]
fn test_any_value_from_conversions() {
    assert_eq!(AnyValue::from("acme"), AnyValue::Str("acme".to_string()));
    assert_eq!(AnyValue::from(true), AnyValue::Bool(true));
    assert_eq!(AnyValue::from(42i64), AnyValue::Int(42));
    assert_eq!(AnyValue::from(1.5), AnyValue::Double(1.5));
}

#[test]
fn test_any_value_as_str() {
    assert_eq!(AnyValue::from("x").as_str(), Some("x"));
    assert_eq!(AnyValue::from(1i64).as_str(), None);
}

#[test]
fn test_any_value_as_f64() {
    assert_eq!(AnyValue::Int(3).as_f64(), Some(3.0));
    assert_eq!(AnyValue::Double(2.5).as_f64(), Some(2.5));
    assert_eq!(AnyValue::Bool(true).as_f64(), None);
}

#[test]
fn test_any_value_display() {
    assert_eq!(AnyValue::from("acme").to_string(), "acme");
    assert_eq!(AnyValue::Int(-7).to_string(), "-7");
    assert_eq!(AnyValue::Bool(false).to_string(), "false");
}

#[test]
fn test_any_value_type_name() {
    assert_eq!(AnyValue::from("s").type_name(), "string");
    assert_eq!(AnyValue::Int(1).type_name(), "int");
    assert_eq!(AnyValue::Double(1.0).type_name(), "double");
    assert_eq!(AnyValue::Bool(true).type_name(), "bool");
}

// =============================================================================
// Attributes tests
// =============================================================================

#[test]
fn test_attributes_builder() {
    let attrs = Attributes::new()
        .with("X-Tenant", "acme")
        .with("retries", 3i64);

    assert_eq!(attrs.len(), 2);
    assert_eq!(attrs.get("X-Tenant"), Some(&AnyValue::from("acme")));
    assert_eq!(attrs.get("retries"), Some(&AnyValue::Int(3)));
    assert!(attrs.get("missing").is_none());
}

#[test]
fn test_attributes_keys_are_case_sensitive() {
    let attrs = Attributes::new().with("X-Tenant", "acme");
    assert!(attrs.contains_key("X-Tenant"));
    assert!(!attrs.contains_key("x-tenant"));
}

#[test]
fn test_attributes_insert_replaces() {
    let mut attrs = Attributes::new().with("env", "dev");
    attrs.insert("env", "prod");
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs.get("env").and_then(AnyValue::as_str), Some("prod"));
}

#[test]
fn test_attributes_iter_sorted() {
    let attrs: Attributes = [("b", "2"), ("a", "1")].into_iter().collect();
    let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn test_attributes_default_empty() {
    let attrs = Attributes::default();
    assert!(attrs.is_empty());
    assert_eq!(attrs.len(), 0);
}
