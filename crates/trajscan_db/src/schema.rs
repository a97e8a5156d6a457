//! Trajectory table DDL and the statement set used by [`TrajDb`].
//!
//! Built-in statements exist for both backends; each one can be replaced from
//! the `[sql_query]` table of the DB config.

use crate::config::{DbBackend, DbConfig};
use crate::error::Result;
use crate::TrajDb;
use tracing::info;

/// Resolved SQL statements for one database.
///
/// `insert` takes nine positional parameters: imgpath, category,
/// pollynet_station, gdas1_station, ending_height, start_time, stop_time,
/// upload_time, insert_time. `delete` takes imgpath and pollynet_station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    pub create: String,
    pub insert: String,
    pub drop: String,
    pub delete: String,
}

impl QuerySet {
    /// Built-in statements for `backend` against `table`.
    pub fn defaults(backend: DbBackend, table: &str) -> Self {
        let columns = "imgpath, category, pollynet_station, gdas1_station, ending_height, \
                       start_time, stop_time, upload_time, insert_time";
        let placeholders = "?, ?, ?, ?, ?, ?, ?, ?, ?";

        match backend {
            DbBackend::Sqlite => Self {
                create: format!(
                    r#"CREATE TABLE IF NOT EXISTS {table} (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        imgpath TEXT NOT NULL,
                        category INTEGER NOT NULL,
                        pollynet_station TEXT NOT NULL,
                        gdas1_station TEXT NOT NULL,
                        ending_height REAL NOT NULL,
                        start_time TEXT NOT NULL,
                        stop_time TEXT NOT NULL,
                        upload_time TEXT NOT NULL,
                        insert_time TEXT NOT NULL,
                        UNIQUE (imgpath, pollynet_station)
                    )"#
                ),
                insert: format!(
                    "INSERT OR REPLACE INTO {table} ({columns}) VALUES ({placeholders})"
                ),
                drop: format!("DROP TABLE IF EXISTS {table}"),
                delete: format!("DELETE FROM {table} WHERE imgpath = ? AND pollynet_station = ?"),
            },
            DbBackend::Mysql => Self {
                create: format!(
                    r#"CREATE TABLE IF NOT EXISTS {table} (
                        id BIGINT AUTO_INCREMENT PRIMARY KEY,
                        imgpath VARCHAR(512) NOT NULL,
                        category INT NOT NULL,
                        pollynet_station VARCHAR(128) NOT NULL,
                        gdas1_station VARCHAR(128) NOT NULL,
                        ending_height DOUBLE NOT NULL,
                        start_time DATETIME NOT NULL,
                        stop_time DATETIME NOT NULL,
                        upload_time DATETIME NOT NULL,
                        insert_time DATETIME NOT NULL,
                        UNIQUE KEY uq_{table}_entry (imgpath, pollynet_station)
                    ) DEFAULT CHARSET = utf8mb4"#
                ),
                insert: format!("REPLACE INTO {table} ({columns}) VALUES ({placeholders})"),
                drop: format!("DROP TABLE IF EXISTS {table}"),
                delete: format!("DELETE FROM {table} WHERE imgpath = ? AND pollynet_station = ?"),
            },
        }
    }

    /// Built-in statements with the config's overrides applied.
    pub fn resolve(config: &DbConfig) -> Self {
        let defaults = Self::defaults(config.backend, &config.table_name);
        let overrides = &config.sql_query;
        Self {
            create: overrides.create_traj_table.clone().unwrap_or(defaults.create),
            insert: overrides.insert_traj_entry.clone().unwrap_or(defaults.insert),
            drop: overrides.drop_traj_table.clone().unwrap_or(defaults.drop),
            delete: overrides.delete_entry.clone().unwrap_or(defaults.delete),
        }
    }
}

impl TrajDb {
    /// Create the trajectory table.
    pub async fn create_table(&self) -> Result<()> {
        self.execute_plain(&self.queries.create).await?;
        info!(table = %self.table_name, "Created the trajectory table");
        Ok(())
    }

    /// Drop the trajectory table.
    pub async fn drop_table(&self) -> Result<()> {
        self.execute_plain(&self.queries.drop).await?;
        info!(table = %self.table_name, "Deleted the trajectory table");
        Ok(())
    }
}
