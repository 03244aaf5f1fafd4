//! Routing error types

use sigroute_config::ConfigError;
use thiserror::Error;

use crate::evaluator::EvaluatorError;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors that can occur while compiling or evaluating a routing table
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The routing configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A statement is not wrapped in `route() where`
    #[error("route {index}: invalid statement '{statement}', expected 'route() where <condition>'")]
    InvalidStatement {
        /// Position of the route in the table
        index: usize,
        /// The offending statement
        statement: String,
    },

    /// The condition evaluator rejected a condition
    #[error("route {index}: failed to compile condition '{condition}': {message}")]
    PredicateCompile {
        /// Position of the route in the table
        index: usize,
        /// Canonical condition handed to the evaluator
        condition: String,
        /// Evaluator's message
        message: String,
    },

    /// A context that has no records of that kind in this signal
    #[error("\"{context}\" context is not supported for {signal}")]
    UnsupportedContextForSignal {
        /// The route context
        context: &'static str,
        /// The signal section
        signal: &'static str,
    },

    /// A predicate failed at evaluation time
    #[error("route {index}: failed to evaluate condition '{condition}': {source}")]
    Evaluation {
        /// Position of the route in the table
        index: usize,
        /// Canonical condition
        condition: String,
        /// Evaluator's error
        #[source]
        source: EvaluatorError,
    },

    /// More distinct pipelines than a `PipelineId` can address
    #[error("too many pipelines (max {max})")]
    TooManyPipelines {
        /// Maximum number of pipelines
        max: usize,
    },
}

impl RoutingError {
    /// Create an InvalidStatement error
    #[inline]
    pub fn invalid_statement(index: usize, statement: impl Into<String>) -> Self {
        Self::InvalidStatement {
            index,
            statement: statement.into(),
        }
    }

    /// Create a PredicateCompile error
    #[inline]
    pub fn predicate_compile(
        index: usize,
        condition: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::PredicateCompile {
            index,
            condition: condition.into(),
            message: message.into(),
        }
    }

    /// Create an Evaluation error
    #[inline]
    pub fn evaluation(index: usize, condition: impl Into<String>, source: EvaluatorError) -> Self {
        Self::Evaluation {
            index,
            condition: condition.into(),
            source,
        }
    }
}
