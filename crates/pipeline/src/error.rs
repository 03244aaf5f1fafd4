//! Pipeline error types
//!
//! Errors raised while binding sinks, forwarding routed data, and running the
//! routing connector.

use thiserror::Error;

use sigroute_routing::{PipelineId, RoutingError};

/// Errors returned by a `PipelineSink`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// No sink is registered for the destination
    #[error("sink not registered")]
    NotRegistered,

    /// Sink channel is closed
    #[error("sink channel closed")]
    Closed,

    /// Sink channel is full and the sink does not wait
    #[error("sink channel full")]
    Full,

    /// The sink refused the data
    #[error("{0}")]
    Rejected(String),

    /// The send task did not complete
    #[error("send task failed: {0}")]
    TaskFailed(String),
}

impl SinkError {
    /// Create a Rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// One destination that could not be reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub id: PipelineId,
    pub pipeline: String,
    pub error: SinkError,
}

impl std::fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.pipeline, self.error)
    }
}

/// Dispatch outcome for a request that did not fully reach its destinations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// At least one destination failed; every failure is listed
    #[error("failed to forward to {} pipeline(s): {}", .0.len(), join_failures(.0))]
    Failed(Vec<DispatchFailure>),

    /// Cancelled before every destination completed
    #[error("dispatch cancelled")]
    Cancelled,
}

impl DispatchError {
    /// Names of the failed pipelines, empty for `Cancelled`
    pub fn failed_pipelines(&self) -> Vec<&str> {
        match self {
            Self::Failed(failures) => failures.iter().map(|f| f.pipeline.as_str()).collect(),
            Self::Cancelled => Vec::new(),
        }
    }
}

fn join_failures(failures: &[DispatchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Routing failed (configuration or propagated predicate error)
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// A routed pipeline has no sink to bind to
    #[error("pipeline '{0}' has no sink")]
    UnboundPipeline(String),

    /// Forwarding failed under `error_mode = propagate`
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
