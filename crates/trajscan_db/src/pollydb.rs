//! Read access to the PollyNET catalogue.
//!
//! When working away from the server, forward the MySQL port first, e.g.
//! `ssh -f user@host -L 7800:localhost:3306 -N`, and point
//! `DATABASE_HOST`/`DATABASE_PORT` at the local end.

use crate::config::PollyAppConfig;
use crate::error::Result;
use crate::types::LidarDataRow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use tracing::{debug, error, info};

const LIDAR_DATA_QUERY: &str = r#"
    SELECT
        l.name AS lidar,
        loc.name AS location,
        ld.starttime AS starttime,
        ld.stoptime AS stoptime,
        CAST(ld.nc_zip_file AS CHAR) AS nc_zip_file,
        CAST(ld.nc_zip_file_size AS SIGNED) AS nc_zip_file_size,
        CAST(l.active AS SIGNED) AS active,
        CAST(ld.gdas AS CHAR) AS gdas,
        CAST(ld.gdas_timestamp AS CHAR) AS gdas_timestamp,
        CAST(ld.software_version AS CHAR) AS software_version
    FROM
        lidar_data ld
            INNER JOIN
        lidar l
            INNER JOIN
        location loc
    WHERE
        (loc.name = ?) AND
        (ld.starttime >= ?) AND
        (ld.stoptime <= ?) AND
        (l.location_fk = loc.id) AND
        (ld.location_fk = loc.id) AND
        (ld.lidar_fk = l.id)
"#;

/// Finds the lidar measurements of a location within a time window.
#[async_trait]
pub trait LidarDataLookup: Send + Sync {
    async fn find_lidar_data(
        &self,
        location: &str,
        start: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Result<Vec<LidarDataRow>>;
}

/// PollyNET catalogue connection.
#[derive(Clone)]
pub struct PollyDb {
    pool: MySqlPool,
}

impl PollyDb {
    /// Connect using the PollyApp credentials.
    pub async fn connect(config: &PollyAppConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port()?)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!(host = %config.host, error = %e, "Failure in connecting the polly database");
                e
            })?;

        info!(host = %config.host, database = %config.database, "Connected to the polly database");
        Ok(Self { pool })
    }

    /// Close the connection pool.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl LidarDataLookup for PollyDb {
    async fn find_lidar_data(
        &self,
        location: &str,
        start: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Result<Vec<LidarDataRow>> {
        let rows = sqlx::query(LIDAR_DATA_QUERY)
            .bind(location)
            .bind(start)
            .bind(stop)
            .fetch_all(&self.pool)
            .await?;

        debug!(location = %location, %start, %stop, rows = rows.len(), "Queried lidar data");
        rows.iter().map(row_to_lidar_data).collect()
    }
}

fn row_to_lidar_data(row: &MySqlRow) -> Result<LidarDataRow> {
    Ok(LidarDataRow {
        lidar: row.try_get("lidar")?,
        location: row.try_get("location")?,
        starttime: row.try_get("starttime")?,
        stoptime: row.try_get("stoptime")?,
        nc_zip_file: row.try_get("nc_zip_file")?,
        nc_zip_file_size: row.try_get("nc_zip_file_size")?,
        active: row.try_get("active")?,
        gdas: row.try_get("gdas")?,
        gdas_timestamp: row.try_get("gdas_timestamp")?,
        software_version: row.try_get("software_version")?,
    })
}
