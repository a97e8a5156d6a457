//! CLI module for the trajectory scanner
//!
//! `sqlite` and `done-filelist` share the same front half (scan the look-back
//! window, classify, fan out per station); the helpers for it live here.

pub mod classify;
pub mod config;
pub mod db;
pub mod done_filelist;
pub mod error;
pub mod sqlite;

use crate::cli::error::HelpfulError;
use chrono::{Local, NaiveDate};
use std::path::Path;
use tracing::info;
use trajscan::scout::{build_entries, parse_plots, scan_plot_files};
use trajscan::{AppConfig, ScoutError};
use trajscan_db::TrajectoryRecord;
use trajscan_logging::{init_logging, LogConfig, LogGuard};

/// Longest look-back window accepted on the command line, about a century.
pub const MAX_SCAN_DAYS: u32 = 36_600;

/// Look-back window shared by the scanning commands
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ScanWindowArgs {
    /// Number of days to look back (default: SCAN_DAYS from the config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=MAX_SCAN_DAYS as i64))]
    pub days: Option<u32>,

    /// Newest date to scan, YYYYMMDD (default: today)
    #[arg(long)]
    pub start: Option<String>,
}

impl ScanWindowArgs {
    /// Resolve to a start date and a day count.
    pub fn resolve(&self, config: &AppConfig) -> anyhow::Result<(NaiveDate, u32)> {
        let start = parse_start(self.start.as_deref())?;
        Ok((start, self.days.unwrap_or(config.scanner.scan_days)))
    }
}

/// Load the main config, turning the usual mistakes into helpful errors.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    AppConfig::load(path).map_err(|e| -> anyhow::Error {
        match e {
            ScoutError::ConfigNotFound(missing) if missing == path => {
                HelpfulError::config_not_found(path).into()
            }
            ScoutError::ConfigNotFound(missing) => HelpfulError::new(format!(
                "Referenced config file not found: {}",
                missing.display()
            ))
            .with_context(format!("Referenced from {}", path.display()))
            .with_suggestion("TRY: Relative paths are resolved against the folder of the main config")
            .into(),
            other => HelpfulError::invalid_config(path, &other.to_string()).into(),
        }
    })
}

/// Start the per-run log file in the configured log folder.
///
/// Keep the returned guard alive until the command finishes.
pub fn start_logging(config: &AppConfig, verbose: bool) -> anyhow::Result<LogGuard> {
    let log_dir = config.log_dir();
    let guard = init_logging(LogConfig {
        log_dir: &log_dir,
        level: config.log_level,
        started_at: Local::now().naive_local(),
        verbose,
    })?;
    info!(log_file = %guard.path().display(), config = %config.config_path.display(), "Logging started");
    Ok(guard)
}

/// Parse `--start`, defaulting to today.
pub fn parse_start(value: Option<&str>) -> anyhow::Result<NaiveDate> {
    match value {
        None => Ok(Local::now().date_naive()),
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y%m%d")
            .map_err(|_| anyhow::Error::from(HelpfulError::invalid_start_date(text))),
    }
}

/// Scan the window and build one record per PollyNET station.
pub fn collect_records(
    config: &AppConfig,
    start: NaiveDate,
    days: u32,
) -> anyhow::Result<Vec<TrajectoryRecord>> {
    let root = config.trajectory_root();
    if !root.is_dir() {
        return Err(HelpfulError::trajectory_root_not_found(&root).into());
    }

    info!(root = %root.display(), %start, days, "Start to scan the backward trajectory results");
    let (files, _stats) = scan_plot_files(&root, &config.stations, start, days)?;
    let plots = parse_plots(&files, config.interval);
    let records = build_entries(&plots, &config.stations);

    info!(
        files = files.len(),
        plots = plots.len(),
        records = records.len(),
        "Prepared trajectory entries"
    );
    Ok(records)
}

/// Single-threaded runtime for the database commands.
pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_date() {
        assert_eq!(
            parse_start(Some("20190930")).unwrap(),
            NaiveDate::from_ymd_opt(2019, 9, 30).unwrap()
        );
        assert!(parse_start(Some("2019-09-30")).is_err());
        assert!(parse_start(Some("20190931")).is_err());
        assert_eq!(parse_start(None).unwrap(), Local::now().date_naive());
    }

    #[test]
    fn missing_main_config_is_helpful() {
        let err = load_config(Path::new("/nonexistent/scanner_config.toml")).unwrap_err();
        let helpful = err.downcast_ref::<HelpfulError>().unwrap();
        assert!(helpful.message.contains("Config file not found"));
    }
}
