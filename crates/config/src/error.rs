//! Configuration error types
//!
//! Validation messages are part of the user-facing contract and are kept
//! stable across releases.

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// No `[traces]`, `[metrics]` or `[logs]` section present
    #[error("no signals configured - at least one of [traces], [metrics] or [logs] is required")]
    NoSignalsConfigured,

    /// A signal section failed validation
    #[error("{signal}: {source}")]
    Signal {
        /// Section name (traces, metrics, logs)
        signal: &'static str,
        /// The validation failure
        #[source]
        source: Box<ConfigError>,
    },

    /// The routing table has no entries
    #[error("invalid routing table: the routing table is empty")]
    EmptyTable,

    /// A route has neither a condition nor a statement
    #[error("invalid route: no condition or statement provided")]
    NoPredicate,

    /// A route has no target pipelines
    #[error("invalid route: no pipelines defined")]
    NoPipelines,

    /// A route has both a condition and a statement
    #[error("invalid route: both condition and statement provided")]
    AmbiguousPredicate,

    /// A route names an unknown context
    #[error("invalid context: {0}")]
    InvalidContext(String),

    /// A leaf-record context used together with fan-out routing
    #[error("\"{0}\" context is not supported with \"match_once: false\"")]
    UnsupportedContextForFanout(String),

    /// A request-context route configured with a statement
    #[error("\"request\" context requires a 'condition'")]
    RequestRequiresCondition,

    /// A request-context condition that is not a single metadata comparison
    #[error("condition must have format 'request[\"<name>\"] <comparator> <value>'")]
    MalformedRequestCondition,
}

impl ConfigError {
    /// Create an InvalidContext error
    pub fn invalid_context(value: impl Into<String>) -> Self {
        Self::InvalidContext(value.into())
    }

    /// Create an UnsupportedContextForFanout error
    pub fn unsupported_for_fanout(context: impl Into<String>) -> Self {
        Self::UnsupportedContextForFanout(context.into())
    }

    /// Wrap an error with the signal section it came from
    pub fn in_signal(signal: &'static str, source: ConfigError) -> Self {
        Self::Signal {
            signal,
            source: Box::new(source),
        }
    }

    /// Strip signal-section wrapping, returning the underlying error
    pub fn root_cause(&self) -> &ConfigError {
        match self {
            Self::Signal { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
