#![allow(dead_code)]

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn trajscan_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_trajscan"))
}

pub fn run_cli(cwd: &Path, args: &[&str]) -> Output {
    Command::new(trajscan_bin())
        .current_dir(cwd)
        .args(args)
        .env_remove("TRAJSCAN_CONFIG")
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to execute trajscan CLI")
}

pub fn parse_json_output(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json_start = stdout.find(|c| c == '{' || c == '[').unwrap_or_else(|| {
        panic!(
            "no JSON payload found in output\nstdout:\n{}\nstderr:\n{}",
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    });
    let mut deserializer = serde_json::Deserializer::from_str(&stdout[json_start..]);
    serde_json::Value::deserialize(&mut deserializer).unwrap_or_else(|err| {
        panic!(
            "failed to parse JSON output: {}\nstdout:\n{}\nstderr:\n{}",
            err,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

pub fn run_cli_json(cwd: &Path, args: &[&str]) -> serde_json::Value {
    let output = run_cli(cwd, args);
    assert!(
        output.status.success(),
        "command failed: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    parse_json_output(&output)
}

/// Project layout used by the CLI tests:
///
/// ```text
/// <tmp>/config/{scanner_config,station_name,db_config}.toml
/// <tmp>/trajectories/<station>/<YYYY>/<MM>/<DD>/*.png
/// <tmp>/data/          sqlite file
/// <tmp>/log/           per-run logs
/// ```
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp project");
        let config_dir = dir.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();

        fs::write(
            config_dir.join("scanner_config.toml"),
            r#"
LOGMODE = "INFO"
DB_CONFIG_FILE = "db_config.toml"
STATION_NAME_FILE = "station_name.toml"
TRAJECTORY_ROOT = "../trajectories"
INTERVAL_TRAJ_FIG = "03:00:00"
DONE_FILELIST = "../done_filelist.txt"
SCAN_DAYS = 30
"#,
        )
        .unwrap();
        fs::write(
            config_dir.join("station_name.toml"),
            r#"
[leipzig]
name_PollyNET = ["Leipzig", "Leipzig_TROPOS"]

[evora]
name_PollyNET = ["Evora"]
"#,
        )
        .unwrap();
        fs::write(
            config_dir.join("db_config.toml"),
            r#"
backend = "sqlite"
db_path = "../data"
db_filename = "pollynet_traj.db"
"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("trajectories")).unwrap();

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config").join("scanner_config.toml")
    }

    pub fn db_path(&self) -> PathBuf {
        self.root().join("data")
    }

    pub fn add_plot(&self, station: &str, ymd: &str, name: &str) -> PathBuf {
        let (y, rest) = ymd.split_at(4);
        let (m, d) = rest.split_at(2);
        let dir = self
            .root()
            .join("trajectories")
            .join(station)
            .join(y)
            .join(m)
            .join(d);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, b"png").unwrap();
        path
    }

    /// Run with `--config` pointing at this project.
    pub fn run(&self, args: &[&str]) -> Output {
        let config = self.config_path();
        let mut full = vec!["--config", config.to_str().unwrap()];
        full.extend_from_slice(args);
        run_cli(self.root(), &full)
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "command failed: {}\nstdout:\n{}\nstderr:\n{}",
            args.join(" "),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        parse_json_output(&output)
    }
}
