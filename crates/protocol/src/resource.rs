//! Resource and instrumentation scope envelopes

use crate::Attributes;

/// The entity that produced a group of records (service, host, pod...)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    /// Resource attributes (e.g. `service.name`)
    pub attributes: Attributes,
}

impl Resource {
    /// Create a resource with the given attributes
    #[inline]
    pub fn new(attributes: Attributes) -> Self {
        Self { attributes }
    }
}

/// The instrumentation library that produced a group of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    /// Instrumentation scope name
    pub name: String,
    /// Instrumentation scope version
    pub version: String,
    /// Scope attributes
    pub attributes: Attributes,
}

impl Scope {
    /// Create a scope with a name and no version or attributes
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
