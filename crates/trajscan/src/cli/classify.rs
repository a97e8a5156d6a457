//! `classify`: show how plot file names are recognized.

use chrono::NaiveDateTime;
use serde::Serialize;
use trajscan::config::parse_interval;
use trajscan::scout::{time_range, try_classify};

/// Arguments for the classify command
#[derive(Debug, clap::Args)]
pub struct ClassifyArgs {
    /// Plot file names (a leading directory is ignored)
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Time span of map/profile plots, HH:MM:SS
    #[arg(long, default_value = "03:00:00")]
    pub interval: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Classification result of one name
#[derive(Debug, Serialize)]
struct ClassifiedName {
    file_name: String,
    matched: bool,
    category: Option<u8>,
    description: Option<&'static str>,
    date: Option<String>,
    hour: Option<u32>,
    ending_height: Option<f64>,
    start_time: Option<NaiveDateTime>,
    stop_time: Option<NaiveDateTime>,
    error: Option<String>,
}

impl ClassifiedName {
    fn unmatched(file_name: String, error: Option<String>) -> Self {
        Self {
            file_name,
            matched: false,
            category: None,
            description: None,
            date: None,
            hour: None,
            ending_height: None,
            start_time: None,
            stop_time: None,
            error,
        }
    }
}

pub fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    let interval = parse_interval(&args.interval)?;

    let results: Vec<ClassifiedName> = args
        .names
        .iter()
        .map(|name| {
            let file_name = name.rsplit('/').next().unwrap_or(name).to_string();
            match try_classify(&file_name) {
                Ok(Some(c)) => {
                    let (start, stop) = time_range(&c, interval);
                    ClassifiedName {
                        file_name,
                        matched: true,
                        category: Some(c.category.code()),
                        description: Some(c.category.description()),
                        date: Some(c.date.format("%Y-%m-%d").to_string()),
                        hour: c.hour,
                        ending_height: Some(c.ending_height),
                        start_time: Some(start),
                        stop_time: Some(stop),
                        error: None,
                    }
                }
                Ok(None) => ClassifiedName::unmatched(file_name, None),
                Err(e) => ClassifiedName::unmatched(file_name, Some(e.to_string())),
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        match (result.category, &result.error) {
            (Some(code), _) => println!(
                "{}\n  category: {} ({})\n  time:     {} .. {}\n  height:   {} m",
                result.file_name,
                code,
                result.description.unwrap_or_default(),
                result.start_time.map(|t| t.to_string()).unwrap_or_default(),
                result.stop_time.map(|t| t.to_string()).unwrap_or_default(),
                result.ending_height.unwrap_or_default(),
            ),
            (None, Some(error)) => println!("{}\n  error: {}", result.file_name, error),
            (None, None) => println!("{}\n  no match", result.file_name),
        }
    }

    Ok(())
}
