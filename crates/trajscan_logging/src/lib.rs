//! Logging setup for the trajectory scanner binaries.
//!
//! Every run gets its own log file named after the run start time
//! (`<YYYYmmdd_HHMMSS>_log`) in the configured log folder, plus terse
//! message-only output on stderr.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_TARGETS: &[&str] = &["trajscan", "trajscan_db", "trajscan_logging"];

/// Verbosity accepted in the `LOGMODE` config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(anyhow!(
                "unknown log mode '{}' (expected DEBUG, INFO, WARNING or ERROR)",
                other
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Logging configuration for a single scanner run.
pub struct LogConfig<'a> {
    pub log_dir: &'a Path,
    pub level: LogLevel,
    pub started_at: NaiveDateTime,
    pub verbose: bool,
}

/// Keeps the background log writer alive.
///
/// Buffered lines are flushed to the log file when this is dropped.
pub struct LogGuard {
    path: PathBuf,
    _worker: WorkerGuard,
}

impl LogGuard {
    /// Path of the run's log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Initialize tracing with a per-run log file and stderr output.
pub fn init_logging(config: LogConfig<'_>) -> Result<LogGuard> {
    let file_name = log_file_name(&config.started_at);
    let file_appender = file_appender(config.log_dir, &file_name)?;
    let (file_writer, worker) = tracing_appender::non_blocking(file_appender);

    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config.level)));

    let console_filter = if config.verbose {
        EnvFilter::new(default_filter(LogLevel::Debug))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(config.level)))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .with_level(false)
                .with_filter(console_filter),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(LogGuard {
        path: config.log_dir.join(file_name),
        _worker: worker,
    })
}

/// Console-only logging for commands that run without a config.
pub fn init_console_logging(verbose: bool) -> Result<()> {
    let level = if verbose { LogLevel::Debug } else { LogLevel::Warning };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false)
                .with_level(false)
                .with_filter(filter),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}

/// File name for a run started at `time`.
pub fn log_file_name(time: &NaiveDateTime) -> String {
    format!("{}_log", time.format("%Y%m%d_%H%M%S"))
}

/// Appender writing to `<log_dir>/<file_name>`, never rotated.
fn file_appender(log_dir: &Path, file_name: &str) -> Result<RollingFileAppender> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(log_dir)
        .with_context(|| format!("Failed to open log file {}", log_dir.join(file_name).display()))
}

fn default_filter(level: LogLevel) -> String {
    let level = level.as_directive();
    let mut directives = vec!["warn".to_string()];
    directives.extend(LOG_TARGETS.iter().map(|t| format!("{}={}", t, level)));
    directives.join(",")
}
