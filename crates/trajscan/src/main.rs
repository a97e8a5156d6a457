//! trajscan - backward-trajectory plot scanner
//!
//! Scans `<root>/<station>/<YYYY>/<MM>/<DD>/*.png` for trajectory plots and
//! records them in the trajectory table or in the done manifest read by the
//! PollyNET ingestion job.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use trajscan::config::DEFAULT_CONFIG_PATH;
use trajscan::AppConfig;
use trajscan_logging::LogGuard;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "trajscan", version, about = "Backward-trajectory plot scanner for PollyNET")]
struct Cli {
    /// Main config file
    #[arg(long, global = true, env = "TRAJSCAN_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Defaults to `done-filelist` with the config's look-back window
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the look-back window into the trajectory table
    Sqlite(cli::sqlite::SqliteArgs),

    /// Scan the look-back window and append it to the done manifest
    DoneFilelist(cli::done_filelist::DoneFilelistArgs),

    /// Show how plot file names are classified (no config required)
    Classify(cli::classify::ClassifyArgs),

    /// Trajectory table maintenance
    Db {
        #[command(subcommand)]
        action: cli::db::DbAction,
    },

    /// Show the resolved configuration
    Config(cli::config::ConfigArgs),
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    let verbose = cli.verbose;
    let command = cli
        .command
        .unwrap_or_else(|| Commands::DoneFilelist(Default::default()));

    match command {
        Commands::Classify(args) => {
            trajscan_logging::init_console_logging(verbose)?;
            cli::classify::run(args)
        }
        Commands::Sqlite(args) => {
            let (config, _log) = setup(&cli.config, verbose)?;
            cli::sqlite::run(args, &config)
        }
        Commands::DoneFilelist(args) => {
            let (config, _log) = setup(&cli.config, verbose)?;
            cli::done_filelist::run(args, &config)
        }
        Commands::Db { action } => {
            let (config, _log) = setup(&cli.config, verbose)?;
            cli::db::run(action, &config)
        }
        Commands::Config(args) => {
            let (config, _log) = setup(&cli.config, verbose)?;
            cli::config::run(args, &config)
        }
    }
}

/// Load the config and open the run's log file.
///
/// The log file is flushed when the returned guard is dropped.
fn setup(config_path: &Path, verbose: bool) -> anyhow::Result<(AppConfig, LogGuard)> {
    let config = cli::load_config(config_path)?;
    let guard = cli::start_logging(&config, verbose)?;
    Ok((config, guard))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
