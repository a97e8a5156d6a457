//! `db`: maintenance of the trajectory table.

use super::runtime;
use super::sqlite::open_db;
use clap::Subcommand;
use trajscan::AppConfig;

/// Subcommands of `db`
#[derive(Debug, Subcommand)]
pub enum DbAction {
    /// Drop the trajectory table
    Drop,
    /// Delete the entries of one image for one PollyNET station
    Delete {
        /// Full image path as stored in the table
        #[arg(long)]
        imgpath: String,

        /// PollyNET station name
        #[arg(long)]
        station: String,
    },
}

pub fn run(action: DbAction, config: &AppConfig) -> anyhow::Result<()> {
    let db_config = config.db_config()?;

    runtime()?.block_on(async {
        let db = open_db(&db_config).await?;
        let result = match &action {
            DbAction::Drop => db.drop_table().await.map(|()| {
                println!("Dropped table {}", db_config.table_name);
            }),
            DbAction::Delete { imgpath, station } => {
                db.delete_entry(imgpath, station).await.map(|deleted| {
                    println!("Deleted {} entries", deleted);
                })
            }
        };
        db.close().await;
        result.map_err(anyhow::Error::from)
    })
}
