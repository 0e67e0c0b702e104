//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Identity of the "Grid" layout in [`sample_layout_set`].
pub const GRID_ID: &str = "{11111111-1111-1111-1111-111111111111}";
/// Identity of the "Focus" layout in [`sample_layout_set`].
pub const FOCUS_ID: &str = "{22222222-2222-2222-2222-222222222222}";

/// Path to the zonekeys binary (set by cargo at compile time)
pub fn zonekeys_bin() -> &'static str {
    env!("CARGO_BIN_EXE_zonekeys")
}

/// Two layouts; "Grid" holds quick key 3.
pub fn sample_layout_set() -> Value {
    json!({
        "layouts": [
            {
                "uuid": GRID_ID,
                "name": "Grid",
                "type": "grid",
                "sensitivityRadius": 20,
                "zoneCount": 4,
                "quickKey": 3
            },
            {
                "uuid": FOCUS_ID,
                "name": "Focus",
                "type": "focus",
                "sensitivityRadius": 20,
                "zoneCount": 3
            }
        ],
        "quickKeys": [
            { "key": 3, "layoutId": GRID_ID }
        ]
    })
}

/// Workspace for one CLI test: a temp dir holding the layouts and config files.
pub struct Workspace {
    /// Keeps the directory alive
    pub temp_dir: TempDir,
    /// Layouts file passed with `--file`
    pub layouts_file: PathBuf,
    /// Config file passed with `--config` (absent unless written)
    pub config_file: PathBuf,
}

impl Workspace {
    /// Empty workspace; the layouts file does not exist yet.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let layouts_file = temp_dir.path().join("layouts.json");
        let config_file = temp_dir.path().join("config.toml");
        Self {
            temp_dir,
            layouts_file,
            config_file,
        }
    }

    /// Workspace seeded with [`sample_layout_set`].
    pub fn with_sample() -> Self {
        let workspace = Self::empty();
        workspace.write_layouts(&sample_layout_set());
        workspace
    }

    /// Overwrites the layouts file.
    pub fn write_layouts(&self, value: &Value) {
        fs::write(
            &self.layouts_file,
            serde_json::to_string_pretty(value).expect("Failed to serialize layouts"),
        )
        .expect("Failed to write layouts file");
    }

    /// Writes a config file.
    pub fn write_config(&self, content: &str) {
        fs::write(&self.config_file, content).expect("Failed to write config file");
    }

    /// Reads the layouts file back as JSON.
    pub fn read_layouts(&self) -> Value {
        read_json(&self.layouts_file)
    }

    /// Runs `zonekeys <group> <command> [args] --file <layouts> --config <config>`.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(zonekeys_bin())
            .args(args)
            .arg("--file")
            .arg(&self.layouts_file)
            .arg("--config")
            .arg(&self.config_file)
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute command")
    }
}

/// Parses a JSON file.
pub fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("Failed to read file");
    serde_json::from_str(&content).expect("Failed to parse JSON")
}

/// Parses stdout as JSON.
pub fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

/// Asserts the process exit code, printing stderr on mismatch.
pub fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit code. stdout: {} stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}
