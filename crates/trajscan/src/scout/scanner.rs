//! Date-directed scanner for the trajectory root
//!
//! Plots live in `<root>/<station>/<YYYY>/<MM>/<DD>/*.png`. Instead of walking
//! the whole tree, the scanner visits one day directory per station for each
//! date of the look-back window, newest first.

use super::types::PlotFile;
use crate::config::StationTable;
use crate::error::Result;
use chrono::{Days, NaiveDate};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Statistics from a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Dates visited
    pub dates: usize,
    /// Day directories that existed
    pub dirs_present: usize,
    pub files_found: usize,
    /// Entries the glob could not read
    pub glob_errors: usize,
    pub duration_ms: u64,
}

/// Find the `.png` files of every station for `start` and the `days` days
/// before it.
pub fn scan_plot_files(
    root: &Path,
    stations: &StationTable,
    start: NaiveDate,
    days: u32,
) -> Result<(Vec<PlotFile>, ScanStats)> {
    let started = Instant::now();
    let mut stats = ScanStats::default();
    let mut files = Vec::new();

    for offset in 0..=u64::from(days) {
        let Some(date) = start.checked_sub_days(Days::new(offset)) else {
            warn!(%start, days, "Look-back window reaches past the earliest date, stopping");
            break;
        };
        stats.dates += 1;

        for station in stations.gdas1_stations() {
            let dir = root
                .join(station)
                .join(date.format("%Y").to_string())
                .join(date.format("%m").to_string())
                .join(date.format("%d").to_string());
            if !dir.is_dir() {
                continue;
            }
            stats.dirs_present += 1;

            let pattern = format!(
                "{}/*.png",
                glob::Pattern::escape(&dir.to_string_lossy())
            );
            for entry in glob::glob(&pattern)? {
                match entry {
                    Ok(path) => {
                        let Some(file_name) = path.file_name() else {
                            continue;
                        };
                        files.push(PlotFile {
                            file_name: file_name.to_string_lossy().into_owned(),
                            dir: dir.clone(),
                            station: station.to_string(),
                        });
                        stats.files_found += 1;
                    }
                    Err(e) => {
                        stats.glob_errors += 1;
                        warn!(error = %e, "Cannot read entry");
                    }
                }
            }
            debug!(dir = %dir.display(), "Searched day directory");
        }
    }

    stats.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        root = %root.display(),
        dates = stats.dates,
        dirs = stats.dirs_present,
        files = stats.files_found,
        errors = stats.glob_errors,
        duration_ms = stats.duration_ms,
        "Scan complete"
    );

    Ok((files, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn stations() -> StationTable {
        [
            ("leipzig".to_string(), vec!["Leipzig".to_string()]),
            ("evora".to_string(), vec!["Evora".to_string()]),
        ]
        .into_iter()
        .collect()
    }

    fn put(root: &Path, rel_dir: &str, name: &str) {
        let dir = root.join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), b"png").unwrap();
    }

    #[test]
    fn scans_window_newest_first_and_stations_sorted() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        put(root, "leipzig/2019/09/30", "20190930_00_00500_trajectories_map.png");
        put(root, "evora/2019/09/30", "20190930_00_00500_trajectories_map.png");
        put(root, "leipzig/2019/09/29", "20190929_00_00500_trajectories_map.png");
        put(root, "leipzig/2019/09/29", "notes.txt");
        // outside the window
        put(root, "leipzig/2019/09/27", "20190927_00_00500_trajectories_map.png");
        // not in the station table
        put(root, "punta/2019/09/30", "20190930_00_00500_trajectories_map.png");

        let start = NaiveDate::from_ymd_opt(2019, 9, 30).unwrap();
        let (files, stats) = scan_plot_files(root, &stations(), start, 2).unwrap();

        let seen: Vec<(String, String)> = files
            .iter()
            .map(|f| (f.station.clone(), f.file_name.clone()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("evora".into(), "20190930_00_00500_trajectories_map.png".into()),
                ("leipzig".into(), "20190930_00_00500_trajectories_map.png".into()),
                ("leipzig".into(), "20190929_00_00500_trajectories_map.png".into()),
            ]
        );
        assert_eq!(files[2].dir, root.join("leipzig/2019/09/29"));
        assert_eq!(stats.dates, 3);
        assert_eq!(stats.dirs_present, 3);
        assert_eq!(stats.files_found, 3);
        assert_eq!(stats.glob_errors, 0);
    }

    #[test]
    fn zero_days_scans_only_the_start_date() {
        let tmp = TempDir::new().unwrap();
        put(tmp.path(), "evora/2020/01/01", "a.png");
        put(tmp.path(), "evora/2019/12/31", "b.png");

        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let (files, stats) = scan_plot_files(tmp.path(), &stations(), start, 0).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "a.png");
        assert_eq!(stats.dates, 1);
    }

    #[test]
    fn window_past_the_calendar_stops_at_the_earliest_date() {
        let start = NaiveDate::from_ymd_opt(2019, 9, 30).unwrap();
        let (files, stats) = scan_plot_files(
            Path::new("/nonexistent/traj"),
            &StationTable::default(),
            start,
            u32::MAX,
        )
        .unwrap();
        assert!(files.is_empty());
        let reachable = (start - NaiveDate::MIN).num_days() + 1;
        assert_eq!(stats.dates as i64, reachable);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let (files, stats) =
            scan_plot_files(Path::new("/nonexistent/traj"), &stations(), start, 5).unwrap();
        assert!(files.is_empty());
        assert_eq!(stats.dates, 6);
        assert_eq!(stats.dirs_present, 0);
    }
}
