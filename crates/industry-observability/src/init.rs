// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for Industry binaries
//!
//! Console output is always on. When a log directory is given, a JSON log of
//! the same events is also written under a timestamped run folder.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Keeps the file writer alive; logs are flushed when it is dropped
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving the JSON log, if file logging is on
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Create `<base>/run_<timestamp>/`
pub fn create_run_folder(base_log_dir: &Path) -> Result<PathBuf> {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

/// Initialize logging with console output and optional file output
///
/// ```text
/// <log_dir>/
///   └── run_20250101_120000/
///       └── industry.log   (JSON lines)
/// ```
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `log_dir` - Base directory for JSON logs; `None` disables file output
pub fn init_logging(debug_flags: &CrateDebugFlags, log_dir: Option<&Path>) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string();
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers = Vec::new();

    // Console layer (human-readable)
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter.clone())
        .boxed();
    layers.push(console_layer);

    let mut file_guard = None;
    let mut run_folder = None;

    if let Some(base) = log_dir {
        let folder = create_run_folder(base)?;
        let appender = rolling::never(&folder, "industry.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(env_filter)
            .boxed();
        layers.push(file_layer);

        file_guard = Some(guard);
        run_folder = Some(folder);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("Logging was already initialized")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_dir: run_folder,
    })
}
