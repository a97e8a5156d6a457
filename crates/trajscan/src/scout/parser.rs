//! Turns scanned files into trajectory plots and table records.

use super::patterns::{time_range, try_classify};
use super::types::{PlotFile, TrajectoryPlot};
use crate::config::StationTable;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};
use trajscan_db::TrajectoryRecord;

/// Classify scanned files.
///
/// Files matching no pattern are skipped. So are files whose modification
/// time cannot be read or whose name carries an invalid date.
pub fn parse_plots(files: &[PlotFile], interval: Duration) -> Vec<TrajectoryPlot> {
    let mut plots = Vec::with_capacity(files.len());

    for file in files {
        let classification = match try_classify(&file.file_name) {
            Ok(Some(c)) => c,
            Ok(None) => {
                debug!(file = %file.file_name, station = %file.station, "Skipping unrecognized file");
                continue;
            }
            Err(e) => {
                warn!(error = %e, path = %file.path().display(), "Skipping file");
                continue;
            }
        };

        let path = file.path();
        let upload_time = match std::fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Utc>::from(modified),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Cannot read modification time");
                continue;
            }
        };

        let (start_time, stop_time) = time_range(&classification, interval);
        plots.push(TrajectoryPlot {
            imgpath: path,
            station: file.station.clone(),
            category: classification.category,
            ending_height: classification.ending_height,
            start_time,
            stop_time,
            upload_time,
        });
    }

    debug!(files = files.len(), plots = plots.len(), "Parsed plot files");
    plots
}

/// One record per PollyNET station listed for the plot's GDAS1 station.
pub fn build_entries(plots: &[TrajectoryPlot], stations: &StationTable) -> Vec<TrajectoryRecord> {
    let mut records = Vec::new();

    for plot in plots {
        let Some(names) = stations.pollynet_names(&plot.station) else {
            warn!(station = %plot.station, path = %plot.imgpath.display(), "Station missing from the station table");
            continue;
        };

        let imgpath = plot.imgpath.to_string_lossy().into_owned();
        records.extend(names.iter().map(|name| TrajectoryRecord {
            imgpath: imgpath.clone(),
            category: plot.category.code(),
            pollynet_station: name.clone(),
            gdas1_station: plot.station.clone(),
            ending_height: plot.ending_height,
            start_time: plot.start_time,
            stop_time: plot.stop_time,
            upload_time: plot.upload_time,
        }));
    }

    records
}
