//! Database layer for the trajectory scanner
//!
//! Two stores live here:
//!
//! - [`TrajDb`]: the trajectory table, kept either in a local SQLite file or
//!   on a MySQL server depending on [`DbConfig::backend`].
//! - [`PollyDb`]: read-only access to the PollyNET catalogue (MySQL), used to
//!   find the lidar measurements a trajectory plot belongs to.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trajscan_db::{DbConfig, TrajDb};
//!
//! let db = TrajDb::open(&DbConfig::sqlite("/data/db", "traj.db")).await?;
//! db.create_table().await?;
//! let summary = db.insert_entries(&records).await;
//! db.close().await;
//! ```

mod config;
mod entries;
mod error;
mod pollydb;
mod schema;
mod types;

pub use config::{DbBackend, DbConfig, PollyAppConfig, PortValue, SqlQueryConfig, DEFAULT_TABLE_NAME};
pub use error::{DbError, Result};
pub use pollydb::{LidarDataLookup, PollyDb};
pub use schema::QuerySet;
pub use types::{InsertSummary, LidarDataRow, TrajectoryRecord, DB_TIME_FORMAT};

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{info, warn};

#[derive(Clone)]
enum Pool {
    Sqlite(SqlitePool),
    MySql(MySqlPool),
}

/// Trajectory table store.
#[derive(Clone)]
pub struct TrajDb {
    pool: Pool,
    queries: QuerySet,
    table_name: String,
}

impl TrajDb {
    /// Open (and for SQLite, create) the database described by `config`.
    pub async fn open(config: &DbConfig) -> Result<Self> {
        let queries = QuerySet::resolve(config);

        let pool = match config.backend {
            DbBackend::Sqlite => {
                let path = config.sqlite_file()?;
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }

                let url = format!("sqlite:{}?mode=rwc", path.display());
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect(&url)
                    .await
                    .map_err(|e| {
                        warn!(path = %path.display(), error = %e, "Failed to open SQLite database");
                        e
                    })?;
                info!(path = %path.display(), "Successfully connected to the database");
                Pool::Sqlite(pool)
            }
            DbBackend::Mysql => {
                let url = config.mysql_url()?;
                let pool = MySqlPoolOptions::new()
                    .max_connections(2)
                    .connect(url)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "Failed to connect to MySQL trajectory database");
                        e
                    })?;
                info!("Successfully connected to the MySQL trajectory database");
                Pool::MySql(pool)
            }
        };

        Ok(Self {
            pool,
            queries,
            table_name: config.table_name.clone(),
        })
    }

    pub fn backend(&self) -> DbBackend {
        match self.pool {
            Pool::Sqlite(_) => DbBackend::Sqlite,
            Pool::MySql(_) => DbBackend::Mysql,
        }
    }

    /// Close the database connection.
    pub async fn close(self) {
        match self.pool {
            Pool::Sqlite(pool) => pool.close().await,
            Pool::MySql(pool) => pool.close().await,
        }
    }

    /// Run a parameterless statement, returning the affected row count.
    async fn execute_plain(&self, sql: &str) -> Result<u64> {
        let affected = match &self.pool {
            Pool::Sqlite(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
            Pool::MySql(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
        };
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_database() {
        let tmp = TempDir::new().unwrap();
        let config = DbConfig::sqlite(tmp.path().join("nested"), "traj.db");

        let db = TrajDb::open(&config).await.unwrap();
        assert!(tmp.path().join("nested").join("traj.db").exists());
        assert_eq!(db.backend(), DbBackend::Sqlite);

        db.close().await;
    }

    #[tokio::test]
    async fn test_open_mysql_requires_url() {
        let config = DbConfig {
            backend: DbBackend::Mysql,
            ..DbConfig::default()
        };
        let result = TrajDb::open(&config).await;
        assert!(matches!(result, Err(DbError::Config(_))));
    }
}
