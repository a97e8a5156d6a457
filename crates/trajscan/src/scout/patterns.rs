//! Plot file name patterns.
//!
//! Map and profile plots are named `<YYYYMMDD>_<HH>_<HHHHH>_trajectories_<kind>.png`
//! (date, start hour, ending height in metres). The daily ensemble plots are
//! named `<YYYYMMDD>_<anything>-<overlay>-below<level>.png`.

use super::types::{Category, Classification};
use crate::error::{Result, ScoutError};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Patterns in matching order.
static PATTERNS: Lazy<Vec<(Category, Regex)>> = Lazy::new(|| {
    let run = |kind: &str| format!(r"^(\d{{8}})_(\d{{2}})_(\d{{5}})_trajectories_{kind}\.png$");
    let daily = |overlay: &str, level: &str| format!(r"^(\d{{8}})_.*-{overlay}-below{level}\.png$");

    let geonames = "geonames-abs-region-ens";
    let land_use = "land-use-abs-occ-ens";

    [
        (Category::TrajectoryProfile, run("prof")),
        (Category::TrajectoryMap, run("map")),
        (Category::LandUseBelow2km, daily(land_use, r"2\.0km")),
        (Category::LandUseBelow5km, daily(land_use, r"5\.0km")),
        (Category::LandUseBelow8km, daily(land_use, r"8\.0km")),
        (Category::LandUseBelowMd, daily(land_use, "md")),
        (Category::GeonamesBelow2km, daily(geonames, r"2\.0km")),
        (Category::GeonamesBelow5km, daily(geonames, r"5\.0km")),
        (Category::GeonamesBelow8km, daily(geonames, r"8\.0km")),
        (Category::GeonamesBelowMd, daily(geonames, "md")),
    ]
    .into_iter()
    .map(|(category, pattern)| {
        let regex = Regex::new(&pattern).expect("valid built-in pattern");
        (category, regex)
    })
    .collect()
});

/// Classify a plot file name.
///
/// Returns `Ok(None)` when no pattern matches and an error when a pattern
/// matches but the embedded date is not a calendar date.
pub fn try_classify(file_name: &str) -> Result<Option<Classification>> {
    let Some((category, caps)) = PATTERNS
        .iter()
        .find_map(|(category, regex)| regex.captures(file_name).map(|caps| (*category, caps)))
    else {
        return Ok(None);
    };

    let date_text = &caps[1];
    let date = NaiveDate::parse_from_str(date_text, "%Y%m%d").map_err(|_| {
        ScoutError::InvalidDate {
            file_name: file_name.to_string(),
            value: date_text.to_string(),
        }
    })?;

    let (hour, ending_height) = if category.is_daily() {
        (None, 0.0)
    } else {
        // both groups are all digits
        let hour = caps[2].parse::<u32>().ok();
        let height = caps[3].parse::<f64>().unwrap_or(0.0);
        (hour, height)
    };

    Ok(Some(Classification {
        category,
        date,
        hour,
        ending_height,
    }))
}

/// Classify a plot file name, treating an invalid date like no match.
pub fn classify(file_name: &str) -> Option<Classification> {
    try_classify(file_name).ok().flatten()
}

/// Time span covered by a classified plot.
///
/// Map and profile plots cover `interval` from midnight of their date; daily
/// plots cover the whole day up to 23:59:59.
pub fn time_range(
    classification: &Classification,
    interval: Duration,
) -> (NaiveDateTime, NaiveDateTime) {
    let start = classification.date.and_time(chrono::NaiveTime::MIN);
    let span = if classification.category.is_daily() {
        Duration::seconds(23 * 3600 + 59 * 60 + 59)
    } else {
        interval
    };
    (start, start + span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(name: &str) -> Option<u8> {
        classify(name).map(|c| c.category.code())
    }

    #[test]
    fn recognizes_every_category() {
        let cases = [
            ("20190926_evora-geonames-abs-region-ens-below2.0km.png", 1),
            ("20190926_evora-geonames-abs-region-ens-below5.0km.png", 2),
            ("20190926_evora-geonames-abs-region-ens-below8.0km.png", 3),
            ("20190926_evora-geonames-abs-region-ens-belowmd.png", 4),
            ("20190926_evora-land-use-abs-occ-ens-below2.0km.png", 5),
            ("20190926_evora-land-use-abs-occ-ens-below5.0km.png", 6),
            ("20190926_evora-land-use-abs-occ-ens-below8.0km.png", 7),
            ("20190926_evora-land-use-abs-occ-ens-belowmd.png", 8),
            ("20190926_03_00500_trajectories_map.png", 9),
            ("20190926_03_00500_trajectories_prof.png", 10),
        ];
        for (name, expected) in cases {
            assert_eq!(code(name), Some(expected), "{name}");
        }
    }

    #[test]
    fn profile_plot_fields() {
        let c = classify("20190926_21_02000_trajectories_prof.png").unwrap();
        assert_eq!(c.category, Category::TrajectoryProfile);
        assert_eq!(c.date, NaiveDate::from_ymd_opt(2019, 9, 26).unwrap());
        assert_eq!(c.hour, Some(21));
        assert_eq!(c.ending_height, 2000.0);
    }

    #[test]
    fn daily_plot_has_no_hour_or_height() {
        let c = classify("20191001_leipzig-land-use-abs-occ-ens-belowmd.png").unwrap();
        assert_eq!(c.hour, None);
        assert_eq!(c.ending_height, 0.0);
    }

    #[test]
    fn patterns_are_anchored_with_literal_dot() {
        assert_eq!(code("20190926_03_00500_trajectories_prof.png.bak"), None);
        assert_eq!(code("x20190926_03_00500_trajectories_prof.png"), None);
        assert_eq!(code("20190926_03_00500_trajectories_profXpng"), None);
        assert_eq!(code("20190926_evora-geonames-abs-region-ens-below2x0km.png"), None);
        assert_eq!(code("2019092_03_00500_trajectories_prof.png"), None);
        assert_eq!(code("readme.png"), None);
    }

    #[test]
    fn invalid_calendar_date_is_an_error() {
        let err = try_classify("20191399_03_00500_trajectories_map.png").unwrap_err();
        assert!(matches!(err, ScoutError::InvalidDate { ref value, .. } if value == "20191399"));
        assert_eq!(classify("20191399_03_00500_trajectories_map.png"), None);
        assert!(try_classify("notes.png").unwrap().is_none());
    }

    #[test]
    fn run_plot_spans_the_interval() {
        let c = classify("20190926_03_00500_trajectories_map.png").unwrap();
        let (start, stop) = time_range(&c, Duration::hours(3));
        assert_eq!(start.to_string(), "2019-09-26 00:00:00");
        assert_eq!(stop.to_string(), "2019-09-26 03:00:00");
    }

    #[test]
    fn daily_plot_spans_the_day() {
        let c = classify("20190926_evora-land-use-abs-occ-ens-below2.0km.png").unwrap();
        let (start, stop) = time_range(&c, Duration::hours(3));
        assert_eq!(start.to_string(), "2019-09-26 00:00:00");
        assert_eq!(stop.to_string(), "2019-09-26 23:59:59");
    }
}
