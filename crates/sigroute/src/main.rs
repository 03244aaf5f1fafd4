//! Sigroute - content-based telemetry routing
//!
//! # Usage
//!
//! ```bash
//! # Check a configuration file
//! sigroute validate --config sigroute.toml
//!
//! # Print the compiled routing tables
//! sigroute explain --config sigroute.toml --log-level debug
//! ```

mod cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sigroute_config::{Config, LogConfig, LogFormat, LogOutput};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Sigroute - content-based telemetry routing
#[derive(Parser, Debug)]
#[command(name = "sigroute")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, default_value = "sigroute.toml", global = true)]
    config: PathBuf,

    /// Log filter (e.g. `debug` or `info,sigroute_routing=trace`). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a configuration file
    Validate,

    /// Compile every routing table and print the result
    Explain,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Loading validates; a failure is reported after logging is up
    let loaded = Config::from_file(&cli.config);
    let log = loaded
        .as_ref()
        .map(|config| config.log.clone())
        .unwrap_or_default();
    init_logging(log.effective_level(cli.log_level.as_deref()), &log)?;

    let config =
        loaded.with_context(|| format!("invalid configuration {}", cli.config.display()))?;
    tracing::debug!(path = %cli.config.display(), "configuration loaded");

    match cli.command {
        Command::Validate => cmd::validate::run(&config),
        Command::Explain => cmd::explain::run(&config),
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let json = log.format == LogFormat::Json;
    let console_layer = (!json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(writer(log.output))
    });
    let json_layer = json.then(|| fmt::layer().json().with_writer(writer(log.output)));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .with(filter)
        .init();

    Ok(())
}

fn writer(output: LogOutput) -> BoxMakeWriter {
    match output {
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
    }
}
