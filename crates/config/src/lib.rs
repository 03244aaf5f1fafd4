//! Sigroute Configuration
//!
//! TOML-based configuration for the routing connector. Each signal gets its
//! own routing section; a signal without a section is not routed.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration. Parsing validates every
//! routing table, so a `Config` that exists is safe to compile.
//!
//! ```
//! use sigroute_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str(r#"
//! [traces]
//! default_pipelines = ["otlp-all"]
//!
//! [[traces.table]]
//! statement = 'route() where attributes["X-Tenant"] == "acme"'
//! pipelines = ["otlp-acme"]
//! "#).unwrap();
//!
//! assert!(config.traces.is_some());
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [log]
//! level = "debug"
//! format = "json"
//!
//! [traces]
//! match_once = true
//! error_mode = "propagate"
//! default_pipelines = ["otlp-all"]
//!
//! [[traces.table]]
//! context = "request"
//! condition = 'request["X-Tenant"] == "acme"'
//! pipelines = ["jaeger-acme", "otlp-acme"]
//!
//! [logs]
//! match_once = false
//! error_mode = "ignore"
//!
//! [[logs.table]]
//! context = "resource"
//! condition = 'attributes["env"] == "prod"'
//! pipelines = ["logs-prod"]
//! ```

mod error;
mod logging;
mod routing;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogOutput};
pub use routing::{ErrorMode, RouteContext, RouteSpec, RoutingConfig};
pub use validation::{is_request_condition, validate_routing};

use serde::Deserialize;
use sigroute_protocol::SignalKind;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Routing for trace data
    pub traces: Option<RoutingConfig>,

    /// Routing for metric data
    pub metrics: Option<RoutingConfig>,

    /// Routing for log data
    pub logs: Option<RoutingConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every configured routing section
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Routing section for a signal, if configured
    pub fn routing(&self, signal: SignalKind) -> Option<&RoutingConfig> {
        match signal {
            SignalKind::Traces => self.traces.as_ref(),
            SignalKind::Metrics => self.metrics.as_ref(),
            SignalKind::Logs => self.logs.as_ref(),
        }
    }

    /// Iterate over configured signals and their routing sections
    pub fn signals(&self) -> impl Iterator<Item = (SignalKind, &RoutingConfig)> {
        [SignalKind::Traces, SignalKind::Metrics, SignalKind::Logs]
            .into_iter()
            .filter_map(|signal| self.routing(signal).map(|r| (signal, r)))
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;

    const TENANT_TRACES: &str = r#"
[traces]
default_pipelines = ["otlp-all"]

[[traces.table]]
statement = 'route() where attributes["X-Tenant"] == "acme"'
pipelines = ["jaeger-acme", "otlp-acme"]

[[traces.table]]
statement = 'route() where attributes["X-Tenant"] == "globex"'
pipelines = ["otlp-globex"]
"#;

    #[test]
    fn test_empty_config_is_rejected() {
        let err = Config::from_str("").unwrap_err();
        assert!(matches!(err, ConfigError::NoSignalsConfigured));
    }

    #[test]
    fn test_load_traces_config() {
        let config = Config::from_str(TENANT_TRACES).unwrap();
        let traces = config.traces.as_ref().unwrap();

        assert!(traces.match_once);
        assert_eq!(traces.error_mode, ErrorMode::Propagate);
        assert_eq!(traces.default_pipelines, vec!["otlp-all"]);
        assert_eq!(traces.table.len(), 2);
        assert!(config.metrics.is_none());
        assert!(config.logs.is_none());
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_same_table_for_every_signal() {
        let src = ["traces", "metrics", "logs"]
            .iter()
            .map(|signal| TENANT_TRACES.replace("traces", signal))
            .collect::<Vec<_>>()
            .join("\n");
        let config = Config::from_str(&src).unwrap();

        let signals: Vec<SignalKind> = config.signals().map(|(s, _)| s).collect();
        assert_eq!(
            signals,
            vec![SignalKind::Traces, SignalKind::Metrics, SignalKind::Logs]
        );
        for (_, routing) in config.signals() {
            assert_eq!(routing.table[1].pipelines, vec!["otlp-globex"]);
        }
    }

    #[test]
    fn test_validation_error_names_signal() {
        let err = Config::from_str(
            r#"
[logs]
match_once = false

[[logs.table]]
context = "log"
condition = 'attributes["level"] == "error"'
pipelines = ["errors"]
"#,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            r#"logs: "log" context is not supported with "match_once: false""#
        );
        assert!(matches!(
            err.root_cause(),
            ConfigError::UnsupportedContextForFanout(_)
        ));
    }

    #[test]
    fn test_empty_signal_section_is_rejected() {
        let err = Config::from_str("[metrics]\n").unwrap_err();
        assert!(matches!(err.root_cause(), ConfigError::EmptyTable));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_str("invalid { toml");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TENANT_TRACES.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.routing(SignalKind::Traces).is_some());
        assert!(config.routing(SignalKind::Logs).is_none());
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/nonexistent/sigroute.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert!(err.to_string().contains("/nonexistent/sigroute.toml"));
    }
}
