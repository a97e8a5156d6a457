//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Main config file does not exist
    pub fn config_not_found(path: &Path) -> Self {
        Self::new(format!("Config file not found: {}", path.display()))
            .with_context("The scanner needs scanner_config.toml and the files it references")
            .with_suggestions([
                "TRY: Pass the config explicitly: trajscan --config /path/to/scanner_config.toml sqlite".to_string(),
                "TRY: Or set TRAJSCAN_CONFIG=/path/to/scanner_config.toml".to_string(),
                format!("TRY: Check that the file exists: ls -la {}", path.display()),
            ])
    }

    /// Config file exists but cannot be used
    pub fn invalid_config(path: &Path, details: &str) -> Self {
        Self::new(format!("Invalid configuration: {}", details))
            .with_context(format!("While loading {}", path.display()))
            .with_suggestions([
                "TRY: Show what was resolved: trajscan config".to_string(),
                "TRY: INTERVAL_TRAJ_FIG must be HH:MM:SS and LOGMODE one of DEBUG, INFO, WARNING, ERROR".to_string(),
            ])
    }

    /// Trajectory root is missing
    pub fn trajectory_root_not_found(path: &Path) -> Self {
        Self::new(format!("Trajectory root not found: {}", path.display()))
            .with_context("TRAJECTORY_ROOT must hold <station>/<YYYY>/<MM>/<DD>/ folders")
            .with_suggestions([
                format!("TRY: Check that the folder is mounted: ls -la {}", path.display()),
                "TRY: Relative paths are resolved against the config folder".to_string(),
            ])
    }

    /// `--start` is not a YYYYMMDD date
    pub fn invalid_start_date(value: &str) -> Self {
        Self::new(format!("Invalid start date: '{}'", value))
            .with_context("--start expects a calendar date written as YYYYMMDD")
            .with_suggestion("TRY: trajscan sqlite --start 20190930 --days 7")
    }

    /// Database cannot be opened
    pub fn database_unavailable(target: &str, details: &str) -> Self {
        Self::new("Failed to connect to database")
            .with_context(format!("Database: {}", target))
            .with_suggestions([
                format!("Error: {}", details),
                "TRY: Check the credentials and that the server is reachable".to_string(),
                "TRY: For a remote server, forward the port: ssh -f user@host -L 7800:localhost:3306 -N".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While scanning")
            .with_suggestion("TRY: again");

        let display = format!("{}", err);
        assert!(display.contains("ERROR: Something went wrong"));
        assert!(display.contains("CONTEXT: While scanning"));
        assert!(display.contains("  TRY: again"));
    }

    #[test]
    fn test_config_not_found() {
        let err = HelpfulError::config_not_found(&PathBuf::from("/etc/traj/scanner_config.toml"));

        let display = format!("{}", err);
        assert!(display.contains("/etc/traj/scanner_config.toml"));
        assert!(display.contains("TRAJSCAN_CONFIG"));
    }

    #[test]
    fn test_invalid_start_date() {
        let display = HelpfulError::invalid_start_date("2019-09-30").to_string();
        assert!(display.contains("'2019-09-30'"));
        assert!(display.contains("YYYYMMDD"));
    }
}
