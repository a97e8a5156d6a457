//! Configuration for the trajectory scanner
//!
//! The scanner reads one main file (`scanner_config.toml`, usually kept in
//! `<project>/config/`) which points at the other files: the trajectory DB
//! config, the station name table and the PollyApp credentials. Relative
//! paths in the main file are resolved against the directory holding it.

use crate::error::{Result, ScoutError};
use chrono::{NaiveTime, Timelike};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use trajscan_db::{DbConfig, PollyAppConfig};
use trajscan_logging::LogLevel;

/// Default location of the main config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/scanner_config.toml";

/// Main scanner configuration (`scanner_config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// DEBUG, INFO, WARNING or ERROR
    #[serde(rename = "LOGMODE", default = "default_log_mode")]
    pub log_mode: String,

    /// Log folder (default: `<project>/log`)
    #[serde(rename = "LOG_DIR", default)]
    pub log_dir: Option<PathBuf>,

    #[serde(rename = "DB_CONFIG_FILE", default)]
    pub db_config_file: Option<PathBuf>,

    #[serde(rename = "STATION_NAME_FILE")]
    pub station_name_file: PathBuf,

    /// Root of the `<station>/<YYYY>/<MM>/<DD>/` hierarchy
    #[serde(rename = "TRAJECTORY_ROOT")]
    pub trajectory_root: PathBuf,

    /// Time span covered by profile/map plots, `HH:MM:SS`
    #[serde(rename = "INTERVAL_TRAJ_FIG")]
    pub interval_traj_fig: String,

    #[serde(rename = "POLLYAPP_CONFIG_FILE", default)]
    pub pollyapp_config_file: Option<PathBuf>,

    #[serde(rename = "DONE_FILELIST", default)]
    pub done_filelist: Option<PathBuf>,

    /// Look-back window in days
    #[serde(rename = "SCAN_DAYS", default = "default_scan_days")]
    pub scan_days: u32,
}

fn default_log_mode() -> String {
    "INFO".to_string()
}

fn default_scan_days() -> u32 {
    30
}

/// PollyNET station names associated with one GDAS1 station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEntry {
    #[serde(rename = "name_PollyNET", default)]
    pub pollynet_names: Vec<String>,
}

/// GDAS1 station → PollyNET station names (`STATION_NAME_FILE`).
///
/// Keys are the directory names under the trajectory root and iterate in
/// sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationTable {
    stations: BTreeMap<String, StationEntry>,
}

impl StationTable {
    /// GDAS1 station names, sorted.
    pub fn gdas1_stations(&self) -> impl Iterator<Item = &str> {
        self.stations.keys().map(String::as_str)
    }

    /// PollyNET names for a GDAS1 station.
    pub fn pollynet_names(&self, gdas1_station: &str) -> Option<&[String]> {
        self.stations
            .get(gdas1_station)
            .map(|entry| entry.pollynet_names.as_slice())
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for StationTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            stations: iter
                .into_iter()
                .map(|(name, pollynet_names)| (name, StationEntry { pollynet_names }))
                .collect(),
        }
    }
}

/// Fully loaded configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the main config file
    pub config_path: PathBuf,
    pub scanner: ScannerConfig,
    pub log_level: LogLevel,
    /// Parsed `INTERVAL_TRAJ_FIG`
    pub interval: chrono::Duration,
    pub stations: StationTable,
}

impl AppConfig {
    /// Load the main config file and the station table it references.
    pub fn load(path: &Path) -> Result<Self> {
        let scanner: ScannerConfig = read_toml(path)?;

        let log_level = scanner
            .log_mode
            .parse::<LogLevel>()
            .map_err(|e| ScoutError::Config(e.to_string()))?;
        let interval = parse_interval(&scanner.interval_traj_fig)?;

        let mut config = Self {
            config_path: path.to_path_buf(),
            scanner,
            log_level,
            interval,
            stations: StationTable::default(),
        };

        let station_file = config.resolve(&config.scanner.station_name_file);
        config.stations = read_toml(&station_file)?;
        Ok(config)
    }

    /// Directory holding the main config file.
    pub fn config_dir(&self) -> PathBuf {
        match self.config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Resolve a path from the config against the config directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir().join(path)
        }
    }

    pub fn trajectory_root(&self) -> PathBuf {
        self.resolve(&self.scanner.trajectory_root)
    }

    /// Log folder: `LOG_DIR`, or `log/` next to the config directory.
    pub fn log_dir(&self) -> PathBuf {
        match &self.scanner.log_dir {
            Some(dir) => self.resolve(dir),
            None => {
                let config_dir = self.config_dir();
                let project_dir = config_dir
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or(config_dir);
                project_dir.join("log")
            }
        }
    }

    /// Load the trajectory DB config.
    pub fn db_config(&self) -> Result<DbConfig> {
        let file = self
            .scanner
            .db_config_file
            .as_deref()
            .ok_or_else(|| ScoutError::Config("DB_CONFIG_FILE is not set".to_string()))?;
        let mut config: DbConfig = read_toml(&self.resolve(file))?;
        if let Some(dir) = config.db_path.take() {
            config.db_path = Some(self.resolve(&dir));
        }
        Ok(config)
    }

    /// Load the PollyNET catalogue credentials.
    pub fn pollyapp_config(&self) -> Result<PollyAppConfig> {
        let file = self
            .scanner
            .pollyapp_config_file
            .as_deref()
            .ok_or_else(|| ScoutError::Config("POLLYAPP_CONFIG_FILE is not set".to_string()))?;
        read_toml(&self.resolve(file))
    }

    /// Path of the done manifest.
    pub fn done_filelist(&self) -> Result<PathBuf> {
        self.scanner
            .done_filelist
            .as_deref()
            .map(|p| self.resolve(p))
            .ok_or_else(|| ScoutError::Config("DONE_FILELIST is not set".to_string()))
    }
}

/// Parse an `HH:MM:SS` duration.
pub fn parse_interval(text: &str) -> Result<chrono::Duration> {
    let time = NaiveTime::parse_from_str(text.trim(), "%H:%M:%S").map_err(|e| {
        ScoutError::Config(format!(
            "INTERVAL_TRAJ_FIG '{}' is not HH:MM:SS: {}",
            text, e
        ))
    })?;
    Ok(chrono::Duration::seconds(i64::from(
        time.num_seconds_from_midnight(),
    )))
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ScoutError::ConfigNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ScoutError::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
