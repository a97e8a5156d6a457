//! Trajectory table row operations.

use crate::error::Result;
use crate::types::{InsertSummary, TrajectoryRecord, DB_TIME_FORMAT};
use crate::{Pool, TrajDb};
use chrono::Local;
use tracing::{debug, error, info};

/// Bind the nine insert parameters of a record, in column order.
macro_rules! bind_record {
    ($query:expr, $record:expr, $inserted_at:expr) => {
        $query
            .bind($record.imgpath.clone())
            .bind(i64::from($record.category))
            .bind($record.pollynet_station.clone())
            .bind($record.gdas1_station.clone())
            .bind($record.ending_height)
            .bind($record.start_time.format(DB_TIME_FORMAT).to_string())
            .bind($record.stop_time.format(DB_TIME_FORMAT).to_string())
            .bind($record.upload_time.format(DB_TIME_FORMAT).to_string())
            .bind($inserted_at.clone())
    };
}

impl TrajDb {
    /// Insert records one statement at a time.
    ///
    /// A failing record is logged together with its image path and counted in
    /// the summary; the remaining records are still written.
    pub async fn insert_entries(&self, records: &[TrajectoryRecord]) -> InsertSummary {
        let mut summary = InsertSummary::default();

        for record in records {
            match self.insert_entry(record).await {
                Ok(()) => {
                    summary.inserted += 1;
                    debug!(imgpath = %record.imgpath, station = %record.pollynet_station, "Inserted entry");
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(error = %e, imgpath = %record.imgpath, "Failed to insert entry");
                }
            }
        }

        info!(
            inserted = summary.inserted,
            failed = summary.failed,
            "Finished inserting trajectory entries"
        );
        summary
    }

    /// Insert a single record.
    pub async fn insert_entry(&self, record: &TrajectoryRecord) -> Result<()> {
        let inserted_at = Local::now().naive_local().format(DB_TIME_FORMAT).to_string();
        let sql = self.queries.insert.as_str();

        match &self.pool {
            Pool::Sqlite(pool) => {
                bind_record!(sqlx::query(sql), record, inserted_at)
                    .execute(pool)
                    .await?;
            }
            Pool::MySql(pool) => {
                bind_record!(sqlx::query(sql), record, inserted_at)
                    .execute(pool)
                    .await?;
            }
        }
        Ok(())
    }

    /// Delete the entries of one image for one PollyNET station.
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_entry(&self, imgpath: &str, pollynet_station: &str) -> Result<u64> {
        let sql = self.queries.delete.as_str();
        let affected = match &self.pool {
            Pool::Sqlite(pool) => {
                sqlx::query(sql)
                    .bind(imgpath)
                    .bind(pollynet_station)
                    .execute(pool)
                    .await?
                    .rows_affected()
            }
            Pool::MySql(pool) => {
                sqlx::query(sql)
                    .bind(imgpath)
                    .bind(pollynet_station)
                    .execute(pool)
                    .await?
                    .rows_affected()
            }
        };

        info!(
            imgpath = %imgpath,
            station = %pollynet_station,
            deleted = affected,
            "Deleted trajectory entries"
        );
        Ok(affected)
    }

    /// Number of rows in the trajectory table.
    pub async fn count_entries(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table_name);
        let count = match &self.pool {
            Pool::Sqlite(pool) => sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await?,
            Pool::MySql(pool) => sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await?,
        };
        Ok(count)
    }
}
