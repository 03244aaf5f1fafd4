//! Signal kinds and the shared telemetry trait

use std::fmt;

/// The kind of telemetry signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Traces,
    Metrics,
    Logs,
}

impl SignalKind {
    /// Lowercase name, as used in configuration section names
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Traces => "traces",
            Self::Metrics => "metrics",
            Self::Logs => "logs",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common view over `Traces`, `Metrics` and `Logs`
///
/// The router and dispatcher are generic over this trait so one
/// implementation serves all three signals.
pub trait Telemetry: Clone + Default + Send + Sync + 'static {
    /// Which signal this payload carries
    const KIND: SignalKind;

    /// Number of leaf records (spans, data points, log records)
    fn record_count(&self) -> usize;

    /// Number of resource groups
    fn resource_count(&self) -> usize;

    /// Whether there is nothing worth forwarding
    fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}
