//! Done manifest for the PollyNET ingestion pipeline.
//!
//! The manifest is a flat text file of `key=value` blocks, each closed by a
//! `------` line. Only the below-2.0 km geonames and land-use plots are
//! published; every lidar measurement of the plot's station inside the plot's
//! time span gets its own block.

use crate::error::Result;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use trajscan_db::{LidarDataLookup, LidarDataRow, TrajectoryRecord};

/// Time format used throughout the manifest.
pub const DONE_TIME_FORMAT: &str = "%Y%m%d %H:%M:%S";

const BLOCK_SEPARATOR: &str = "------";
const LAMBDA: u32 = 355;
const LIDAR_RATIO: u32 = 50;
const INFO: &str = "ensemble trajectory plot that was reanalysed from HYSPLIT outputs";

/// Product published for a trajectory category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    AirmassOriginGeo,
    AirmassOriginLanduse,
}

impl ProductType {
    /// Product for a category code, if the category is published.
    pub fn for_category(category: u8) -> Option<Self> {
        match category {
            1 => Some(ProductType::AirmassOriginGeo),
            5 => Some(ProductType::AirmassOriginLanduse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::AirmassOriginGeo => "airmass_origin_geo",
            ProductType::AirmassOriginLanduse => "airmass_origin_landuse",
        }
    }
}

/// One manifest block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoneEntry {
    pub lidar: String,
    pub location: String,
    pub starttime: NaiveDateTime,
    pub stoptime: NaiveDateTime,
    pub last_update: NaiveDateTime,
    /// Image path relative to the trajectory root
    pub image: String,
    pub nc_zip_file: Option<String>,
    pub nc_zip_file_size: Option<i64>,
    pub active: Option<i64>,
    pub software_version: Option<String>,
    pub product_type: ProductType,
    pub product_starttime: NaiveDateTime,
    pub product_stoptime: NaiveDateTime,
}

impl DoneEntry {
    /// Manifest fields in output order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let time = |t: &NaiveDateTime| t.format(DONE_TIME_FORMAT).to_string();
        let opt = |v: Option<String>| v.unwrap_or_default();

        vec![
            ("lidar", self.lidar.clone()),
            ("location", self.location.clone()),
            ("starttime", time(&self.starttime)),
            ("stoptime", time(&self.stoptime)),
            ("last_update", time(&self.last_update)),
            ("lambda", LAMBDA.to_string()),
            ("image", self.image.clone()),
            ("level", "0".to_string()),
            ("info", INFO.to_string()),
            ("nc_zip_file", opt(self.nc_zip_file.clone())),
            ("nc_zip_file_size", opt(self.nc_zip_file_size.map(|v| v.to_string()))),
            ("active", opt(self.active.map(|v| v.to_string()))),
            ("GDAS", String::new()),
            ("GDAS_timestamp", String::new()),
            ("lidar_ratio", LIDAR_RATIO.to_string()),
            ("software_version", opt(self.software_version.clone())),
            ("product_type", self.product_type.as_str().to_string()),
            ("product_starttime", time(&self.product_starttime)),
            ("product_stoptime", time(&self.product_stoptime)),
        ]
    }

    fn write_block<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for (key, value) in self.fields() {
            writeln!(out, "{}={}", key, value)?;
        }
        writeln!(out, "{}", BLOCK_SEPARATOR)
    }
}

/// Look up the lidar measurements behind each published record.
///
/// Records of unpublished categories are skipped. A failing lookup aborts the
/// conversion.
pub async fn convert_to_done_entries<L>(
    records: &[TrajectoryRecord],
    lookup: &L,
    trajectory_root: &Path,
) -> Result<Vec<DoneEntry>>
where
    L: LidarDataLookup + ?Sized,
{
    let mut entries = Vec::new();

    for record in records {
        let Some(product_type) = ProductType::for_category(record.category) else {
            continue;
        };

        let rows = lookup
            .find_lidar_data(&record.pollynet_station, record.start_time, record.stop_time)
            .await?;
        if rows.is_empty() {
            debug!(station = %record.pollynet_station, imgpath = %record.imgpath, "No lidar data for plot");
            continue;
        }

        let image = relative_image_path(&record.imgpath, trajectory_root);
        let last_update = Local::now().naive_local();
        entries.extend(
            rows.into_iter()
                .map(|row| done_entry(row, record, &image, product_type, last_update)),
        );
    }

    Ok(entries)
}

fn done_entry(
    row: LidarDataRow,
    record: &TrajectoryRecord,
    image: &str,
    product_type: ProductType,
    last_update: NaiveDateTime,
) -> DoneEntry {
    DoneEntry {
        lidar: row.lidar,
        location: row.location,
        starttime: row.starttime,
        stoptime: row.stoptime,
        last_update,
        image: image.to_string(),
        nc_zip_file: row.nc_zip_file,
        nc_zip_file_size: row.nc_zip_file_size,
        active: row.active,
        software_version: row.software_version,
        product_type,
        product_starttime: record.start_time,
        product_stoptime: record.stop_time,
    }
}

fn relative_image_path(imgpath: &str, root: &Path) -> String {
    match Path::new(imgpath).strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => {
            warn!(imgpath = %imgpath, root = %root.display(), "Image is outside the trajectory root");
            imgpath.to_string()
        }
    }
}

/// Append entries to the done manifest, creating it when missing.
pub fn append_done_filelist(path: &Path, entries: &[DoneEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);

    for entry in entries {
        info!(
            "write {}, {}, {} to the done_filelist",
            entry.image, entry.location, entry.lidar
        );
        entry.write_block(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

/// Convert `records` and append the result to the manifest at `path`.
///
/// The manifest is only opened once every lookup succeeded. Returns the
/// number of blocks written.
pub async fn write_done_filelist<L>(
    records: &[TrajectoryRecord],
    lookup: &L,
    trajectory_root: &Path,
    path: &Path,
) -> Result<usize>
where
    L: LidarDataLookup + ?Sized,
{
    let entries = convert_to_done_entries(records, lookup, trajectory_root).await?;
    append_done_filelist(path, &entries)?;
    Ok(entries.len())
}
