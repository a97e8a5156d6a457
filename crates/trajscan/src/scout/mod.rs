//! Scout - trajectory plot discovery & classification
//!
//! Scout walks the trajectory root day by day, recognizes plot files by name
//! and turns them into table records, one per PollyNET station.

pub mod parser;
pub mod patterns;
pub mod scanner;
pub mod types;

pub use parser::{build_entries, parse_plots};
pub use patterns::{classify, time_range, try_classify};
pub use scanner::{scan_plot_files, ScanStats};
pub use types::{Category, Classification, PlotFile, TrajectoryPlot};
