//! Tests for RequestMetadata and Request

use crate::{Request, RequestMetadata, Traces};

#[test]
fn test_metadata_case_insensitive_lookup() {
    let md = RequestMetadata::new().with("X-Tenant", "acme");

    assert_eq!(md.get("x-tenant"), Some("acme"));
    assert_eq!(md.get("X-TENANT"), Some("acme"));
    assert!(md.contains_key("X-Tenant"));
}

#[test]
fn test_metadata_multiple_values() {
    let md = RequestMetadata::new()
        .with("x-tenant", "acme")
        .with("X-Tenant", "globex");

    assert_eq!(md.len(), 1);
    assert_eq!(md.get_all("x-tenant"), &["acme", "globex"]);
    assert_eq!(md.get("x-tenant"), Some("acme"));
}

#[test]
fn test_metadata_missing_key() {
    let md = RequestMetadata::new();
    assert!(md.is_empty());
    assert!(md.get_all("anything").is_empty());
    assert_eq!(md.get("anything"), None);
}

#[test]
fn test_request_from_payload_has_empty_metadata() {
    let request = Request::from_payload(Traces::new());
    assert!(request.metadata.is_empty());
    assert_eq!(request.payload, Traces::new());
}
