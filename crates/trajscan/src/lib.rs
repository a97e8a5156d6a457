//! trajscan - backward-trajectory plot scanner
//!
//! Finds the trajectory plots of the PollyNET stations, classifies them by
//! file name and records them in the trajectory table or the done manifest.

pub mod config;
pub mod error;
pub mod manifest;
pub mod scout;

pub use config::{AppConfig, ScannerConfig, StationTable};
pub use error::{Result, ScoutError};
pub use manifest::{
    append_done_filelist, convert_to_done_entries, write_done_filelist, DoneEntry, ProductType,
};
