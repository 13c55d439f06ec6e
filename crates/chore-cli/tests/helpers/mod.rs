#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness for running CLI commands against a throwaway database and session file
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
    session_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let session_path = temp_dir.path().join("session.json");

        Self {
            temp_dir,
            db_path,
            session_path,
        }
    }

    /// A harness with someone already signed in.
    pub fn signed_in(name: &str) -> Self {
        let harness = Self::new();
        harness.run_success(&["login", name]);
        harness
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("chore").expect("Failed to find chore binary");

        cmd.current_dir(self.temp_dir.path())
            .env("CHORE_DATABASE_PATH", &self.db_path)
            .env("CHORE_SESSION_PATH", &self.session_path)
            .env("CHORE_TIMEZONE", "UTC")
            .env_remove("CHORE_COMPLETION_ANCHOR")
            .env_remove("CHORE_CONFIG")
            .env_remove("RUST_LOG");

        cmd
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Adds a chore and returns its full ID.
    pub fn add_chore(&self, name: &str, every: &str, due: &str) -> String {
        self.run_success(&["add", name, "-m", "15", "-e", every, "--due", due]);
        self.export()
            .as_array()
            .expect("export is a JSON array")
            .iter()
            .find(|t| t["name"] == name)
            .and_then(|t| t["id"].as_str())
            .expect("added chore is exported")
            .to_string()
    }

    pub fn export(&self) -> serde_json::Value {
        let output = self.run_success(&["export"]).get_output().stdout.clone();
        serde_json::from_slice(&output).expect("export prints JSON")
    }

    pub fn list_json(&self) -> serde_json::Value {
        let output = self
            .run_success(&["list", "--json"])
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("list --json prints JSON")
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    pub fn has_bucket_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Chore"))
            .and(predicate::str::contains("Disgust"))
    }

    pub fn chore_added_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("Added chore"))
    }

    pub fn not_signed_in() -> impl Predicate<str> {
        predicate::str::contains("Not signed in")
    }
}
