//! Request metadata and the request envelope
//!
//! Metadata behaves like gRPC metadata or HTTP headers: keys are
//! case-insensitive and a key may carry several values.

use std::collections::HashMap;

/// Metadata attached to an incoming request by its transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Lowercased key → values in arrival order
    entries: HashMap<String, Vec<String>>,
}

impl RequestMetadata {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    #[must_use]
    pub fn with(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// Append a value for a key (existing values are kept)
    pub fn append(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .entry(key.as_ref().to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// All values for a key, empty if the key is absent
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_lowercase())
    }

    /// Number of distinct keys
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A telemetry payload together with the metadata it arrived with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request<T> {
    pub metadata: RequestMetadata,
    pub payload: T,
}

impl<T> Request<T> {
    #[inline]
    pub fn new(metadata: RequestMetadata, payload: T) -> Self {
        Self { metadata, payload }
    }

    /// Wrap a payload with empty metadata
    #[inline]
    pub fn from_payload(payload: T) -> Self {
        Self {
            metadata: RequestMetadata::default(),
            payload,
        }
    }
}
