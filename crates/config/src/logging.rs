//! `[log]` section: the router's own diagnostics
//!
//! `level` is an `EnvFilter` directive, so per-crate levels work:
//!
//! ```toml
//! [log]
//! level = "info,sigroute_routing=trace"
//! format = "json"
//! output = "stdout"
//! ```

use serde::Deserialize;

const DEFAULT_LEVEL: &str = "info";

/// How log lines are rendered
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// Where log lines go
///
/// Defaults to stderr so `sigroute explain` output on stdout stays clean.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stderr,
    Stdout,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive, e.g. `debug` or `warn,sigroute_pipeline=debug`
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            format: LogFormat::default(),
            output: LogOutput::default(),
        }
    }
}

impl LogConfig {
    /// The filter to install: a `--log-level` flag wins over the file
    pub fn effective_level<'a>(&'a self, cli: Option<&'a str>) -> &'a str {
        match cli.map(str::trim) {
            Some(level) if !level.is_empty() => level,
            _ if self.level.trim().is_empty() => DEFAULT_LEVEL,
            _ => &self.level,
        }
    }
}
