//! Validate command
//!
//! The configuration has already been validated by loading it; this reports
//! what was found.

use anyhow::Result;
use sigroute_config::Config;

pub fn run(config: &Config) -> Result<()> {
    for line in summary(config) {
        println!("{line}");
    }
    tracing::info!(signals = config.signals().count(), "configuration is valid");
    Ok(())
}

/// One line per configured signal
pub fn summary(config: &Config) -> Vec<String> {
    config
        .signals()
        .map(|(signal, routing)| {
            format!(
                "{signal}: ok ({} route(s), {} default pipeline(s), {} pipeline(s) referenced)",
                routing.table.len(),
                routing.default_pipelines.len(),
                routing.referenced_pipelines().len(),
            )
        })
        .collect()
}
