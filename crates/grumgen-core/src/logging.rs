//! Logging infrastructure for grumgen.
//!
//! Structured logging uses the `tracing` ecosystem. The operational log is kept
//! apart from the interactive terminal: prompts and progress bars own stdout,
//! the console layer only surfaces warnings unless `-v` is given.
//!
//! ## Features
//!
//! - JSON lines format for machine parsing
//! - File output to `~/.grumgen/logs/grumgen.log` (rotated daily)
//! - Console output to stderr with configurable verbosity
//! - `RUST_LOG` overrides the default filter
//!
//! ## Example
//!
//! ```no_run
//! use grumgen_core::logging;
//!
//! // Initialize logging (call once at startup)
//! let _guard = logging::init_logging(None, false).expect("logging init");
//!
//! tracing::info!("grumgen started");
//! tracing::debug!(task = "phpcs", "building task options");
//! ```

use std::path::PathBuf;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{GrumgenError, Result};

/// Name of the rolling log file.
pub const LOG_FILE_NAME: &str = "grumgen.log";

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the grumgen logging system.
///
/// This sets up:
/// - File logging to `<log_dir>/grumgen.log` (JSON lines, INFO or DEBUG)
/// - Console logging to stderr (WARN, or DEBUG when `verbose`)
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.grumgen/logs/`
/// * `verbose` - If true, both layers log at DEBUG.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir)
        .map_err(|e| GrumgenError::directory_creation(&log_dir, e))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grumgen=debug"));

    let (file_level, console_level) = if verbose {
        (LevelFilter::DEBUG, LevelFilter::DEBUG)
    } else {
        (LevelFilter::INFO, LevelFilter::WARN)
    };

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(file_level);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_filter(console_level);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Get the default log directory path.
///
/// Returns `~/.grumgen/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| GrumgenError::internal("home directory not found"))?;
    Ok(home.join(".grumgen").join("logs"))
}

/// Get the default log file path.
pub fn default_log_file() -> Result<PathBuf> {
    Ok(default_log_dir()?.join(LOG_FILE_NAME))
}
