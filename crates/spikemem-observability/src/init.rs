// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization
//!
//! Console output is always installed. With the `file-logging` feature and a
//! configured `log_dir`, a combined log file is written to a timestamped run
//! folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── spikemem.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::{parse_debug_flags, CrateDebugFlags};
use crate::config::ObservabilityConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps background writers alive; drop it last
#[derive(Debug)]
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving the log file, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Install the global subscriber
///
/// # Errors
///
/// Fails if the filter directives do not parse, the run folder cannot be
/// created, or a global subscriber is already installed.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    config: &ObservabilityConfig,
) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&config.level);
    let env_filter = EnvFilter::try_new(&filter)
        .with_context(|| format!("Invalid log filter '{}'", filter))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(config.ansi)
            .with_filter(env_filter)
            .boxed(),
    );

    #[cfg(feature = "file-logging")]
    let (file_guard, log_dir) = match &config.log_dir {
        Some(base) => {
            let (layer, guard, run_folder) = file_layer(base, &filter)?;
            layers.push(layer);
            (Some(guard), Some(run_folder))
        }
        None => (None, None),
    };
    #[cfg(not(feature = "file-logging"))]
    let log_dir = None;

    Registry::default()
        .with(layers)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guard: file_guard,
        log_dir,
    })
}

/// Initialise from command-line flags, `SPIKEMEM_DEBUG`, and a base level
pub fn init_logging_default(level: &str) -> Result<LoggingGuard> {
    init_logging(&parse_debug_flags(), &ObservabilityConfig::with_level(level))
}

/// Best-effort subscriber for tests; honours `RUST_LOG` and ignores reinstallation
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(feature = "file-logging")]
fn file_layer(
    base_log_dir: &Path,
    filter: &str,
) -> Result<(BoxedLayer, tracing_appender::non_blocking::WorkerGuard, PathBuf)> {
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    let appender = tracing_appender::rolling::never(&run_folder, "spikemem.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(EnvFilter::try_new(filter)?)
        .boxed();

    Ok((layer, guard, run_folder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected_before_install() {
        let config = ObservabilityConfig::with_level("spikemem=loud");
        let result = init_logging(&CrateDebugFlags::default(), &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_second_install_fails() {
        let config = ObservabilityConfig::with_level("warn");
        let flags = CrateDebugFlags::default();
        let first = init_logging(&flags, &config);
        let second = init_logging(&flags, &config);
        assert!(second.is_err());
        if let Ok(guard) = first {
            assert!(guard.log_dir().is_none());
        }
    }
}
