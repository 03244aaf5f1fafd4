//! Trace data: resource → scope → span

use crate::{Attributes, Resource, Scope, SignalKind, Telemetry};

/// A single span
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Span {
    /// Trace identifier
    pub trace_id: u128,
    /// Span identifier
    pub span_id: u64,
    /// Operation name
    pub name: String,
    /// Span attributes
    pub attributes: Attributes,
}

impl Span {
    /// Create a span with a name and attributes
    pub fn new(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
            ..Default::default()
        }
    }
}

/// Spans produced by one instrumentation scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeSpans {
    pub scope: Scope,
    pub spans: Vec<Span>,
}

impl ScopeSpans {
    pub fn new(scope: Scope, spans: Vec<Span>) -> Self {
        Self { scope, spans }
    }
}

/// Spans produced by one resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceSpans {
    pub resource: Resource,
    pub scope_spans: Vec<ScopeSpans>,
}

impl ResourceSpans {
    pub fn new(resource: Resource, scope_spans: Vec<ScopeSpans>) -> Self {
        Self {
            resource,
            scope_spans,
        }
    }

    /// Number of spans across all scopes
    pub fn span_count(&self) -> usize {
        self.scope_spans.iter().map(|s| s.spans.len()).sum()
    }
}

/// A batch of trace data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traces {
    pub resource_spans: Vec<ResourceSpans>,
}

impl Traces {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append of a resource group
    #[must_use]
    pub fn with(mut self, resource_spans: ResourceSpans) -> Self {
        self.resource_spans.push(resource_spans);
        self
    }

    /// Total number of spans
    pub fn span_count(&self) -> usize {
        self.resource_spans.iter().map(ResourceSpans::span_count).sum()
    }
}

impl Telemetry for Traces {
    const KIND: SignalKind = SignalKind::Traces;

    fn record_count(&self) -> usize {
        self.span_count()
    }

    fn resource_count(&self) -> usize {
        self.resource_spans.len()
    }
}
