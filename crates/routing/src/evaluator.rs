//! Condition evaluator seam
//!
//! The router never interprets condition text itself. An evaluator compiles a
//! condition once per route and evaluates the compiled predicate against the
//! unit selected by the route's context.

use std::fmt;

use sigroute_config::RouteContext;
use sigroute_protocol::{DataPoint, LogRecord, Metric, RequestMetadata, Resource, Scope, Span};
use thiserror::Error;

/// Error reported by a condition evaluator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EvaluatorError {
    message: String,
}

impl EvaluatorError {
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The unit a compiled predicate is evaluated against
///
/// Leaf variants carry their resource and scope so conditions can look at
/// the enclosing envelope.
#[derive(Debug, Clone, Copy)]
pub enum EvalContext<'a> {
    Request(&'a RequestMetadata),
    Resource(&'a Resource),
    Span {
        resource: &'a Resource,
        scope: &'a Scope,
        span: &'a Span,
    },
    Metric {
        resource: &'a Resource,
        scope: &'a Scope,
        metric: &'a Metric,
    },
    DataPoint {
        resource: &'a Resource,
        scope: &'a Scope,
        metric: &'a Metric,
        point: &'a DataPoint,
    },
    Log {
        resource: &'a Resource,
        scope: &'a Scope,
        record: &'a LogRecord,
    },
}

impl<'a> EvalContext<'a> {
    /// The route context this unit belongs to
    pub fn kind(&self) -> RouteContext {
        match self {
            Self::Request(_) => RouteContext::Request,
            Self::Resource(_) => RouteContext::Resource,
            Self::Span { .. } => RouteContext::Span,
            Self::Metric { .. } => RouteContext::Metric,
            Self::DataPoint { .. } => RouteContext::DataPoint,
            Self::Log { .. } => RouteContext::Log,
        }
    }

    /// Enclosing resource, if the unit has one
    pub fn resource(&self) -> Option<&'a Resource> {
        match *self {
            Self::Request(_) => None,
            Self::Resource(resource) => Some(resource),
            Self::Span { resource, .. }
            | Self::Metric { resource, .. }
            | Self::DataPoint { resource, .. }
            | Self::Log { resource, .. } => Some(resource),
        }
    }

    /// Enclosing scope, for leaf units
    pub fn scope(&self) -> Option<&'a Scope> {
        match *self {
            Self::Request(_) | Self::Resource(_) => None,
            Self::Span { scope, .. }
            | Self::Metric { scope, .. }
            | Self::DataPoint { scope, .. }
            | Self::Log { scope, .. } => Some(scope),
        }
    }
}

/// Compiles condition strings and evaluates them against telemetry
///
/// Implementations must be safe to share across concurrent requests.
pub trait ConditionEvaluator: Send + Sync + 'static {
    /// Compiled form of a condition
    type Predicate: Send + Sync + fmt::Debug;

    /// Compile a condition for the given (effective) route context
    fn compile(
        &self,
        condition: &str,
        context: RouteContext,
    ) -> Result<Self::Predicate, EvaluatorError>;

    /// Evaluate a compiled predicate
    fn evaluate(
        &self,
        predicate: &Self::Predicate,
        ctx: &EvalContext<'_>,
    ) -> Result<bool, EvaluatorError>;
}
