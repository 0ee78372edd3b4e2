// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialisation
//!
//! Console logging goes to stderr. With the `file-logging` feature a run can
//! also write a JSON log under a timestamped folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── spikescan.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Keeps file writers alive; logs are flushed when it drops
#[derive(Default)]
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder, when file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn build_filter(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<EnvFilter> {
    let level: tracing::Level = default_level
        .parse()
        .with_context(|| format!("Invalid log level: {}", default_level))?;
    let directives = debug_flags.to_filter_string(&level.to_string().to_lowercase());
    EnvFilter::try_new(&directives)
        .with_context(|| format!("Invalid log filter: {}", directives))
}

fn console_layer(filter: EnvFilter) -> BoxedLayer {
    tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(filter)
        .boxed()
}

fn install(layers: Vec<BoxedLayer>) -> Result<()> {
    Registry::default()
        .with(layers)
        .try_init()
        .context("A global logger is already installed")
}

/// Initialise console logging on stderr.
///
/// `default_level` applies to every crate not named by a debug flag.
pub fn init_logging(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<LoggingGuard> {
    let filter = build_filter(debug_flags, default_level)?;
    install(vec![console_layer(filter)])?;
    Ok(LoggingGuard::default())
}

/// Initialise console logging plus a JSON log file for this run.
///
/// # Arguments
/// * `log_dir` - Base directory for run folders (default: `./logs`)
/// * `retention_runs` - Keep the N most recent run folders (default: 10)
#[cfg(feature = "file-logging")]
pub fn init_logging_to_dir(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    log_dir: Option<PathBuf>,
    retention_runs: Option<usize>,
) -> Result<LoggingGuard> {
    let filter = build_filter(debug_flags, default_level)?;
    let base_log_dir = log_dir.unwrap_or_else(|| PathBuf::from("./logs"));

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    cleanup_old_runs(&base_log_dir, retention_runs.unwrap_or(10))?;

    let appender = tracing_appender::rolling::never(&run_folder, "spikescan.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter.clone())
        .boxed();

    install(vec![console_layer(filter), file_layer])?;
    Ok(LoggingGuard {
        _file_guard: Some(guard),
        log_dir: Some(run_folder),
    })
}

/// Remove all but the `keep` most recent `run_*` folders.
///
/// Folder names sort chronologically, so no timestamp parsing is needed.
#[cfg(feature = "file-logging")]
fn cleanup_old_runs(base_log_dir: &Path, keep: usize) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }

    let mut runs: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        let is_run = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("run_"));
        if path.is_dir() && is_run {
            runs.push(path);
        }
    }
    runs.sort();

    let excess = runs.len().saturating_sub(keep);
    for path in runs.iter().take(excess) {
        if let Err(e) = std::fs::remove_dir_all(path) {
            eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            );
        }
    }
    Ok(())
}
