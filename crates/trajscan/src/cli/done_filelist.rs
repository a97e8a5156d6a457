//! `done-filelist`: publish the look-back window to the done manifest.

use super::error::HelpfulError;
use super::{collect_records, runtime, ScanWindowArgs};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use trajscan::{write_done_filelist, AppConfig};
use trajscan_db::PollyDb;

/// Arguments for the done-filelist command
#[derive(Debug, Default, clap::Args)]
pub struct DoneFilelistArgs {
    #[command(flatten)]
    pub window: ScanWindowArgs,

    /// Manifest to append to (default: DONE_FILELIST from the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DoneSummary {
    records: usize,
    entries: usize,
    output: PathBuf,
}

/// Manifest path: `--output` wins over DONE_FILELIST.
fn output_path(output: Option<PathBuf>, config: &AppConfig) -> anyhow::Result<PathBuf> {
    match output {
        Some(path) => Ok(path),
        None => Ok(config.done_filelist()?),
    }
}

pub fn run(args: DoneFilelistArgs, config: &AppConfig) -> anyhow::Result<()> {
    let output = output_path(args.output, config)?;
    let (start, days) = args.window.resolve(config)?;
    let records = collect_records(config, start, days)?;
    let pollyapp = config.pollyapp_config()?;
    let root = config.trajectory_root();

    let written = runtime()?.block_on(async {
        let polly = PollyDb::connect(&pollyapp).await.map_err(|e| {
            HelpfulError::database_unavailable(
                &format!("{}@{}/{}", pollyapp.user, pollyapp.host, pollyapp.database),
                &e.to_string(),
            )
        })?;
        let written = write_done_filelist(&records, &polly, &root, &output).await;
        polly.close().await;
        anyhow::Ok(written?)
    })?;
    info!(entries = written, output = %output.display(), "Finished the done_filelist");

    let summary = DoneSummary {
        records: records.len(),
        entries: written,
        output,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Appended {} entries to {}",
            summary.entries,
            summary.output.display()
        );
    }
    Ok(())
}
