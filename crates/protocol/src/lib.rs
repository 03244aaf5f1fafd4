//! Sigroute Protocol - Telemetry shapes routed by sigroute
//!
//! This crate provides the data the router looks at:
//! - `Traces`, `Metrics`, `Logs` - Resource → scope → record hierarchies
//! - `Attributes` / `AnyValue` - Typed key-value attributes
//! - `RequestMetadata` - Per-request metadata (gRPC metadata, HTTP headers)
//! - `Request` - A payload paired with the metadata it arrived with
//! - `SignalKind` - Traces, metrics or logs
//!
//! # Design Principles
//!
//! - **Plain data**: No wire codec, no lazy decoding - routing only needs lookups
//! - **Cheap splitting**: Every level is `Clone` so the router can split a
//!   request into per-destination sub-batches
//! - **Envelope preserving**: Records always travel with their resource and scope

mod logs;
mod metrics;
mod request;
mod resource;
mod signal;
mod traces;
mod value;

pub use logs::{LogRecord, Logs, ResourceLogs, ScopeLogs};
pub use metrics::{DataPoint, Metric, Metrics, ResourceMetrics, ScopeMetrics};
pub use request::{Request, RequestMetadata};
pub use resource::{Resource, Scope};
pub use signal::{SignalKind, Telemetry};
pub use traces::{ResourceSpans, ScopeSpans, Span, Traces};
pub use value::{AnyValue, Attributes};

// Test modules - only compiled during testing
#[cfg(test)]
mod request_test;
#[cfg(test)]
mod signal_test;
#[cfg(test)]
mod value_test;
