//! Error types for the trajectory scanner

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Scanner error type
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Database(#[from] trajscan_db::DbError),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid date in file name '{file_name}': {value}")]
    InvalidDate { file_name: String, value: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScoutError>;
