// file: src/logging/logger.rs
// version: 2.0.0
// guid: 18f50383-68b7-4e52-9617-4d8703927c19

//! Logger initialization and configuration

use crate::error::ProvisionError;
use crate::Result;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default filter directive for the chosen verbosity
pub fn default_level(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

fn build_filter(verbose: bool, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)))
}

/// Initialize logging to stderr and, when `log_file` is given, to that file
/// (appended, no ANSI colors). Stdout is left to command output.
pub fn init_logger(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(build_filter(verbose, quiet));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    ProvisionError::config(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;

            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(build_filter(verbose, quiet)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ProvisionError::config(format!("Failed to initialize logger: {}", e)))?;

    if let Some(path) = log_file {
        tracing::debug!("Logging to stderr and {}", path.display());
    }

    Ok(())
}
