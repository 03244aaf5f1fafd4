//! Routing configuration
//!
//! Defines which downstream pipelines receive which telemetry. Routes are
//! evaluated in table order. With `match_once = true` the first matching
//! route wins; with `match_once = false` every matching route receives a copy.
//! Unmatched telemetry goes to `default_pipelines`.
//!
//! # Example
//!
//! ```toml
//! [traces]
//! match_once = true
//! error_mode = "propagate"
//! default_pipelines = ["otlp-all"]
//!
//! [[traces.table]]
//! statement = 'route() where attributes["X-Tenant"] == "acme"'
//! pipelines = ["jaeger-acme", "otlp-acme"]
//!
//! [[traces.table]]
//! context = "request"
//! condition = 'request["X-Tenant"] == "globex"'
//! pipelines = ["otlp-globex"]
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Routing configuration for one signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Stop at the first matching route (true) or fan out to every match (false)
    pub match_once: bool,

    /// What to do with predicate evaluation and forwarding errors
    pub error_mode: ErrorMode,

    /// Pipelines for telemetry no route matched
    /// If empty, unmatched telemetry is dropped
    pub default_pipelines: Vec<String>,

    /// Routing table, evaluated in order
    pub table: Vec<RouteSpec>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            match_once: true,
            error_mode: ErrorMode::default(),
            default_pipelines: Vec::new(),
            table: Vec::new(),
        }
    }
}

impl RoutingConfig {
    /// Check if any routes are configured
    pub fn has_routes(&self) -> bool {
        !self.table.is_empty()
    }

    /// Check if default pipelines are configured
    pub fn has_default(&self) -> bool {
        !self.default_pipelines.is_empty()
    }

    /// All pipeline names referenced by the table and the defaults, first-seen order
    pub fn referenced_pipelines(&self) -> Vec<&str> {
        let mut pipelines: Vec<&str> = Vec::new();
        let names = self
            .default_pipelines
            .iter()
            .chain(self.table.iter().flat_map(|r| r.pipelines.iter()));

        for name in names {
            if !pipelines.contains(&name.as_str()) {
                pipelines.push(name.as_str());
            }
        }

        pipelines
    }

    /// Validate this routing configuration
    pub fn validate(&self) -> Result<()> {
        crate::validation::validate_routing(self)
    }
}

/// A single routing table entry
///
/// Exactly one of `condition` and `statement` must be set. The context is
/// kept as written so a loaded config serializes back unchanged; use
/// [`RouteSpec::parsed_context`] for the typed form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Evaluation context ("", request, resource, span, metric, datapoint, log)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,

    /// Boolean condition evaluated against the context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Routing statement: `route() where <condition>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,

    /// Target pipelines for matched telemetry
    #[serde(default)]
    pub pipelines: Vec<String>,
}

impl RouteSpec {
    /// Route with a bare condition
    pub fn with_condition(
        context: impl Into<String>,
        condition: impl Into<String>,
        pipelines: &[&str],
    ) -> Self {
        Self {
            context: context.into(),
            condition: Some(condition.into()),
            statement: None,
            pipelines: pipelines.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Route with a routing statement
    pub fn with_statement(
        context: impl Into<String>,
        statement: impl Into<String>,
        pipelines: &[&str],
    ) -> Self {
        Self {
            context: context.into(),
            condition: None,
            statement: Some(statement.into()),
            pipelines: pipelines.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The condition, if set to a non-empty string
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref().filter(|c| !c.is_empty())
    }

    /// The statement, if set to a non-empty string
    pub fn statement(&self) -> Option<&str> {
        self.statement.as_deref().filter(|s| !s.is_empty())
    }

    /// Parse the context string into a [`RouteContext`]
    pub fn parsed_context(&self) -> Result<RouteContext> {
        self.context.parse()
    }
}

/// How runtime errors are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Abort the request and return the error to the caller (default)
    #[default]
    Propagate,
    /// Skip the failing route or destination, log and count the error
    Ignore,
    /// Skip the failing route or destination without reporting
    Silent,
}

impl ErrorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Propagate => "propagate",
            Self::Ignore => "ignore",
            Self::Silent => "silent",
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity at which a route's predicate is evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RouteContext {
    /// No context given - the route-level default, evaluated per request
    #[default]
    Unspecified,
    /// Once per request, against request metadata
    Request,
    /// Once per resource group
    Resource,
    /// Once per span
    Span,
    /// Once per metric
    Metric,
    /// Once per metric data point
    DataPoint,
    /// Once per log record
    Log,
}

impl RouteContext {
    /// All recognized contexts
    pub const ALL: [RouteContext; 7] = [
        Self::Unspecified,
        Self::Request,
        Self::Resource,
        Self::Span,
        Self::Metric,
        Self::DataPoint,
        Self::Log,
    ];

    /// Configuration spelling of this context
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Request => "request",
            Self::Resource => "resource",
            Self::Span => "span",
            Self::Metric => "metric",
            Self::DataPoint => "datapoint",
            Self::Log => "log",
        }
    }

    /// Whether the context addresses individual leaf records
    ///
    /// Leaf contexts require `match_once = true`.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Span | Self::Metric | Self::DataPoint | Self::Log)
    }

    /// The context actually used for evaluation
    ///
    /// `Unspecified` is evaluated once per request.
    pub fn effective(&self) -> RouteContext {
        match self {
            Self::Unspecified => Self::Request,
            other => *other,
        }
    }
}

impl FromStr for RouteContext {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ConfigError::invalid_context(s))
    }
}

impl fmt::Display for RouteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
