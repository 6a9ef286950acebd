#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub const TODAY: &str = "2024-06-10";

/// Isolated store and config under a temp dir, pinned to a fixed today.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("homekeep.toml")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.config_path();
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn read_store(&self) -> Value {
        let content = fs::read_to_string(self.store_path()).expect("read store");
        serde_json::from_str(&content).expect("store is JSON")
    }

    pub fn cmd(&self) -> Command {
        self.cmd_on(TODAY)
    }

    pub fn cmd_on(&self, today: &str) -> Command {
        let mut cmd = Command::cargo_bin("homekeep").expect("binary");
        cmd.env_remove("HOMEKEEP_STORE")
            .env_remove("HOMEKEEP_CONFIG")
            .env_remove("HOMEKEEP_TODAY")
            .env_remove("RUST_LOG")
            .arg("--store")
            .arg(self.store_path())
            .arg("--config")
            .arg(self.config_path())
            .arg("--today")
            .arg(today);
        cmd
    }

    /// Run with `--json` and return the parsed envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// Add a task and return its id.
    pub fn add(&self, args: &[&str]) -> String {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let envelope = self.json(&full);
        envelope["data"]["id"]
            .as_str()
            .expect("task id")
            .to_string()
    }
}
