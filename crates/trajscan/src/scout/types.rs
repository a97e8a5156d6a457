//! Core types for the scout
//!
//! The scout walks the trajectory root, recognizes plot files by name and
//! turns them into [`TrajectoryPlot`]s ready to be fanned out per station.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Categories
// ============================================================================

/// Plot subtype, stored as its integer code (1..=10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    GeonamesBelow2km,
    GeonamesBelow5km,
    GeonamesBelow8km,
    GeonamesBelowMd,
    LandUseBelow2km,
    LandUseBelow5km,
    LandUseBelow8km,
    LandUseBelowMd,
    TrajectoryMap,
    TrajectoryProfile,
}

impl Category {
    /// All categories in code order.
    pub const ALL: [Category; 10] = [
        Category::GeonamesBelow2km,
        Category::GeonamesBelow5km,
        Category::GeonamesBelow8km,
        Category::GeonamesBelowMd,
        Category::LandUseBelow2km,
        Category::LandUseBelow5km,
        Category::LandUseBelow8km,
        Category::LandUseBelowMd,
        Category::TrajectoryMap,
        Category::TrajectoryProfile,
    ];

    pub fn code(self) -> u8 {
        match self {
            Category::GeonamesBelow2km => 1,
            Category::GeonamesBelow5km => 2,
            Category::GeonamesBelow8km => 3,
            Category::GeonamesBelowMd => 4,
            Category::LandUseBelow2km => 5,
            Category::LandUseBelow5km => 6,
            Category::LandUseBelow8km => 7,
            Category::LandUseBelowMd => 8,
            Category::TrajectoryMap => 9,
            Category::TrajectoryProfile => 10,
        }
    }

    /// Whether the plot covers a whole day (categories 1..=8) rather than
    /// one trajectory run.
    pub fn is_daily(self) -> bool {
        !matches!(self, Category::TrajectoryMap | Category::TrajectoryProfile)
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::GeonamesBelow2km => "geonames region, below 2.0 km",
            Category::GeonamesBelow5km => "geonames region, below 5.0 km",
            Category::GeonamesBelow8km => "geonames region, below 8.0 km",
            Category::GeonamesBelowMd => "geonames region, below mixing depth",
            Category::LandUseBelow2km => "land-use occurrence, below 2.0 km",
            Category::LandUseBelow5km => "land-use occurrence, below 5.0 km",
            Category::LandUseBelow8km => "land-use occurrence, below 8.0 km",
            Category::LandUseBelowMd => "land-use occurrence, below mixing depth",
            Category::TrajectoryMap => "trajectory map",
            Category::TrajectoryProfile => "trajectory profile",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.description())
    }
}

// ============================================================================
// Scan results
// ============================================================================

/// A `.png` found under `<root>/<station>/<YYYY>/<MM>/<DD>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotFile {
    pub file_name: String,
    /// Directory holding the file
    pub dir: PathBuf,
    /// GDAS1 station directory name
    pub station: String,
}

impl PlotFile {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Metadata extracted from a plot file name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub date: NaiveDate,
    /// Trajectory start hour (map/profile plots only)
    pub hour: Option<u32>,
    /// Ending height in metres; 0 for daily plots
    pub ending_height: f64,
}

/// A classified plot file.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPlot {
    pub imgpath: PathBuf,
    pub station: String,
    pub category: Category,
    pub ending_height: f64,
    pub start_time: NaiveDateTime,
    pub stop_time: NaiveDateTime,
    /// File modification time
    pub upload_time: DateTime<Utc>,
}
