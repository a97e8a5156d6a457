mod common;

use common::{run_cli, Project};
use trajscan_db::{DbConfig, TrajDb};

fn project_with_plots() -> Project {
    let project = Project::new();
    project.add_plot("leipzig", "20190930", "20190930_03_00500_trajectories_prof.png");
    project.add_plot("leipzig", "20190930", "20190930_03_00500_trajectories_map.png");
    project.add_plot(
        "leipzig",
        "20190929",
        "20190929_leipzig-geonames-abs-region-ens-below2.0km.png",
    );
    project.add_plot("evora", "20190928", "20190928_evora-land-use-abs-occ-ens-belowmd.png");
    project.add_plot("evora", "20190928", "legend.png");
    // outside a 2-day window starting 2019-09-30
    project.add_plot("evora", "20190927", "20190927_00_00500_trajectories_prof.png");
    project
}

async fn count_rows(project: &Project) -> i64 {
    let db = TrajDb::open(&DbConfig::sqlite(project.db_path(), "pollynet_traj.db"))
        .await
        .unwrap();
    let count = db.count_entries().await.unwrap();
    db.close().await;
    count
}

#[tokio::test]
async fn test_sqlite_scan_inserts_one_row_per_pollynet_station() {
    let project = project_with_plots();

    let summary = project.run_json(&["sqlite", "--start", "20190930", "--days", "2", "--json"]);
    // 3 leipzig plots x 2 names + 1 evora plot x 1 name
    assert_eq!(summary["records"], 7);
    assert_eq!(summary["inserted"], 7);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["backend"], "sqlite");
    assert_eq!(count_rows(&project).await, 7);

    // rescanning the same window does not duplicate rows
    project.run_json(&["sqlite", "--start", "20190930", "--days", "2", "--json"]);
    assert_eq!(count_rows(&project).await, 7);

    // one log file per run next to the config folder
    let logs = std::fs::read_dir(project.root().join("log")).unwrap().count();
    assert!(logs >= 1);
}

#[tokio::test]
async fn test_db_delete_and_drop() {
    let project = project_with_plots();
    project.run_json(&["sqlite", "--start", "20190930", "--days", "2", "--json"]);

    // stored as found below TRAJECTORY_ROOT, which is not normalized
    let imgpath = project
        .root()
        .join("config/../trajectories/leipzig/2019/09/30/20190930_03_00500_trajectories_map.png");
    let output = project.run(&[
        "db",
        "delete",
        "--imgpath",
        imgpath.to_str().unwrap(),
        "--station",
        "Leipzig",
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Deleted 1 entries"));
    assert_eq!(count_rows(&project).await, 6);

    let output = project.run(&["db", "drop"]);
    assert!(output.status.success());

    let db = TrajDb::open(&DbConfig::sqlite(project.db_path(), "pollynet_traj.db"))
        .await
        .unwrap();
    assert!(db.count_entries().await.is_err());
    db.close().await;
}

#[test]
fn test_config_json_resolves_paths() {
    let project = Project::new();
    let value = project.run_json(&["config", "--json"]);

    let root = project.root().join("config").join("../trajectories");
    assert_eq!(value["trajectory_root"]["path"], &*root.to_string_lossy());
    assert_eq!(value["trajectory_root"]["exists"], true);
    assert_eq!(value["interval_seconds"], 3 * 3600);
    assert_eq!(value["scan_days"], 30);
    assert_eq!(value["stations"]["leipzig"][1], "Leipzig_TROPOS");
    assert_eq!(value["database"]["backend"], "sqlite");
    assert!(value["pollyapp"]["error"].is_string());
}

#[test]
fn test_missing_config_is_reported() {
    let project = Project::new();
    let output = run_cli(project.root(), &["--config", "nowhere.toml", "sqlite"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"), "{stderr}");
    assert!(stderr.contains("TRY:"));
}

#[test]
fn test_bad_start_date_is_reported() {
    let project = Project::new();
    let output = project.run(&["sqlite", "--start", "2019-09-30"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("YYYYMMDD"));
}

#[test]
fn test_days_beyond_a_century_is_rejected() {
    let project = project_with_plots();
    let output = project.run(&["sqlite", "--start", "20190930", "--days", "4294967295"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--days"), "{stderr}");
    assert!(!project.db_path().join("pollynet_traj.db").exists());

    project.run_json(&["sqlite", "--start", "20190930", "--days", "36600", "--json"]);
}

#[test]
fn test_no_subcommand_runs_done_filelist() {
    let project = project_with_plots();
    let output = project.run(&[]);
    assert!(!output.status.success());
    // the project has no POLLYAPP_CONFIG_FILE, which only done-filelist needs
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("POLLYAPP_CONFIG_FILE"), "{stderr}");
    assert!(!project.root().join("done_filelist.txt").exists());
}
