//! `sqlite`: scan the look-back window into the trajectory table.

use super::error::HelpfulError;
use super::{collect_records, runtime, ScanWindowArgs};
use serde::Serialize;
use tracing::{error, warn};
use trajscan::AppConfig;
use trajscan_db::{DbBackend, DbConfig, TrajDb};

/// Arguments for the sqlite command
#[derive(Debug, clap::Args)]
pub struct SqliteArgs {
    #[command(flatten)]
    pub window: ScanWindowArgs,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SqliteSummary {
    backend: &'static str,
    records: usize,
    inserted: u64,
    failed: u64,
}

pub fn run(args: SqliteArgs, config: &AppConfig) -> anyhow::Result<()> {
    let (start, days) = args.window.resolve(config)?;
    let records = collect_records(config, start, days)?;
    let db_config = config.db_config()?;

    let summary = runtime()?.block_on(async {
        let db = open_db(&db_config).await?;

        if let Err(e) = db.create_table().await {
            error!(error = %e, "Failure in creating the trajectory table");
        }
        let inserted = db.insert_entries(&records).await;
        db.close().await;
        anyhow::Ok(inserted)
    })?;

    if summary.failed > 0 {
        warn!(failed = summary.failed, "Some entries were not inserted");
    }

    let report = SqliteSummary {
        backend: db_config.backend.as_str(),
        records: records.len(),
        inserted: summary.inserted,
        failed: summary.failed,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Inserted {} of {} entries into the {} database ({} failed)",
            report.inserted, report.records, report.backend, report.failed
        );
    }
    Ok(())
}

/// Open the trajectory DB, reporting connection problems helpfully.
pub(crate) async fn open_db(db_config: &DbConfig) -> anyhow::Result<TrajDb> {
    TrajDb::open(db_config).await.map_err(|e| -> anyhow::Error {
        let target = match db_config.backend {
            DbBackend::Sqlite => db_config
                .sqlite_file()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "sqlite (no db_filename)".to_string()),
            DbBackend::Mysql => "mysql (url from the DB config)".to_string(),
        };
        HelpfulError::database_unavailable(&target, &e.to_string()).into()
    })
}
