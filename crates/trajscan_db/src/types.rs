//! Row types shared by the trajectory store and the PollyNET lookup.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used for every time column of the trajectory table.
pub const DB_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One trajectory plot as seen by one PollyNET station.
///
/// A single image on disk fans out to one record per PollyNET station
/// associated with its GDAS1 station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    /// Full path of the image.
    pub imgpath: String,
    /// Plot category code (1..=10).
    pub category: u8,
    pub pollynet_station: String,
    pub gdas1_station: String,
    /// Ending height of the trajectories in metres (0 for region/land-use plots).
    pub ending_height: f64,
    pub start_time: NaiveDateTime,
    pub stop_time: NaiveDateTime,
    /// Modification time of the image file.
    pub upload_time: DateTime<Utc>,
}

/// Outcome of a batch insert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertSummary {
    pub inserted: u64,
    pub failed: u64,
}

impl InsertSummary {
    pub fn total(&self) -> u64 {
        self.inserted + self.failed
    }
}

/// A lidar measurement row from the PollyNET catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LidarDataRow {
    /// Lidar instrument name, e.g. `PollyXT_CGE`.
    pub lidar: String,
    /// Location name, e.g. `Evora`.
    pub location: String,
    pub starttime: NaiveDateTime,
    pub stoptime: NaiveDateTime,
    pub nc_zip_file: Option<String>,
    pub nc_zip_file_size: Option<i64>,
    pub active: Option<i64>,
    pub gdas: Option<String>,
    pub gdas_timestamp: Option<String>,
    pub software_version: Option<String>,
}
