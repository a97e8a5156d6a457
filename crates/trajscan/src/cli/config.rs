//! `config`: show the resolved configuration.

use trajscan::AppConfig;
use trajscan_db::DbBackend;

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Show resolved settings in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs, config: &AppConfig) -> anyhow::Result<()> {
    let root = config.trajectory_root();
    let log_dir = config.log_dir();

    let stations: serde_json::Map<String, serde_json::Value> = config
        .stations
        .gdas1_stations()
        .map(|name| {
            let names = config.stations.pollynet_names(name).unwrap_or_default();
            (name.to_string(), serde_json::json!(names))
        })
        .collect();

    let database = match config.db_config() {
        Ok(db) => {
            let target = match db.backend {
                DbBackend::Sqlite => db
                    .sqlite_file()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                // hide credentials
                DbBackend::Mysql => db
                    .mysql_url()
                    .map(|url| url.rsplit('@').next().unwrap_or_default().to_string())
                    .unwrap_or_default(),
            };
            serde_json::json!({
                "backend": db.backend.as_str(),
                "target": target,
                "table": db.table_name,
            })
        }
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    };

    let pollyapp = match config.pollyapp_config() {
        Ok(p) => serde_json::json!({
            "host": p.host,
            "port": p.port().ok(),
            "database": p.database,
            "user": p.user,
        }),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    };

    let done_filelist = config
        .done_filelist()
        .map(|p| p.display().to_string())
        .ok();

    if args.json {
        let output = serde_json::json!({
            "config_file": config.config_path.to_string_lossy(),
            "log_mode": config.log_level.to_string(),
            "log_dir": log_dir.to_string_lossy(),
            "trajectory_root": {
                "path": root.to_string_lossy(),
                "exists": root.is_dir(),
            },
            "interval_seconds": config.interval.num_seconds(),
            "scan_days": config.scanner.scan_days,
            "stations": stations,
            "database": database,
            "pollyapp": pollyapp,
            "done_filelist": done_filelist,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Config file:     {}", config.config_path.display());
    println!("Log mode:        {}", config.log_level);
    println!("Log dir:         {}", log_dir.display());
    println!(
        "Trajectory root: {} {}",
        root.display(),
        if root.is_dir() { "(exists)" } else { "(missing)" }
    );
    println!("Interval:        {}", config.scanner.interval_traj_fig);
    println!("Scan days:       {}", config.scanner.scan_days);
    println!(
        "Done filelist:   {}",
        done_filelist.as_deref().unwrap_or("(not set)")
    );
    println!();
    println!("Database:        {}", database);
    println!("PollyApp:        {}", pollyapp);
    println!();
    println!("Stations ({}):", config.stations.len());
    for (name, pollynet) in &stations {
        println!("  {:<16} {}", name, pollynet);
    }

    Ok(())
}
