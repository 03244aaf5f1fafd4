//! Log data: resource → scope → log record

use crate::{Attributes, Resource, Scope, SignalKind, Telemetry};

/// A single log record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogRecord {
    /// Timestamp in nanoseconds since the Unix epoch
    pub time_unix_nano: u64,
    /// Severity as text (e.g. "INFO")
    pub severity_text: String,
    /// Log body
    pub body: String,
    /// Record attributes
    pub attributes: Attributes,
}

impl LogRecord {
    pub fn new(body: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            body: body.into(),
            attributes,
            ..Default::default()
        }
    }
}

/// Log records produced by one instrumentation scope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeLogs {
    pub scope: Scope,
    pub log_records: Vec<LogRecord>,
}

impl ScopeLogs {
    pub fn new(scope: Scope, log_records: Vec<LogRecord>) -> Self {
        Self { scope, log_records }
    }
}

/// Log records produced by one resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceLogs {
    pub resource: Resource,
    pub scope_logs: Vec<ScopeLogs>,
}

impl ResourceLogs {
    pub fn new(resource: Resource, scope_logs: Vec<ScopeLogs>) -> Self {
        Self {
            resource,
            scope_logs,
        }
    }

    /// Number of log records across all scopes
    pub fn log_record_count(&self) -> usize {
        self.scope_logs.iter().map(|s| s.log_records.len()).sum()
    }
}

/// A batch of log data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Logs {
    pub resource_logs: Vec<ResourceLogs>,
}

impl Logs {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append of a resource group
    #[must_use]
    pub fn with(mut self, resource_logs: ResourceLogs) -> Self {
        self.resource_logs.push(resource_logs);
        self
    }

    /// Total number of log records
    pub fn log_record_count(&self) -> usize {
        self.resource_logs
            .iter()
            .map(ResourceLogs::log_record_count)
            .sum()
    }
}

impl Telemetry for Logs {
    const KIND: SignalKind = SignalKind::Logs;

    fn record_count(&self) -> usize {
        self.log_record_count()
    }

    fn resource_count(&self) -> usize {
        self.resource_logs.len()
    }
}
