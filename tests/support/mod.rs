#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway data directory for one test.
pub struct TestDataDir {
    dir: TempDir,
}

impl TestDataDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_file(&self, name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file("planner.toml", contents)
    }

    pub fn read_file(&self, name: &str) -> std::io::Result<String> {
        fs::read_to_string(self.dir.path().join(name))
    }

    /// `planner --data-dir <dir> --backend <backend>` with a clean environment.
    pub fn cmd(&self, backend: &str) -> Command {
        let mut cmd = planner_cmd();
        cmd.arg("--data-dir")
            .arg(self.path())
            .arg("--backend")
            .arg(backend);
        cmd
    }

    /// Run a command with `--json`, assert success and return the envelope.
    pub fn json(&self, backend: &str, args: &[&str]) -> Value {
        let output = self
            .cmd(backend)
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json output")
    }

    pub fn add(&self, backend: &str, description: &str, date: &str, time: &str) -> u64 {
        let value = self.json(
            backend,
            &["add", description, "--date", date, "--time", time],
        );
        value["data"]["id"].as_u64().expect("task id")
    }
}

pub fn planner_cmd() -> Command {
    let mut cmd = Command::cargo_bin("planner").expect("binary");
    cmd.env_remove("PLANNER_DATA_DIR")
        .env_remove("PLANNER_BACKEND")
        .env_remove("RUST_LOG");
    cmd
}

pub const BACKENDS: [&str; 2] = ["csv", "sqlite"];
