//! Isolated test environment with a temp config directory.

#![allow(dead_code)]

use super::{NotehubCommand, StubServer};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment.
///
/// Holds a temp directory with a `config.toml` that points the binary at a
/// stub server (or at an address nothing listens on). The directory is
/// cleaned up on drop.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl TestEnv {
    /// Creates an environment whose config points at `server`.
    pub fn with_server(server: &StubServer) -> Self {
        Self::with_config(&format!("base_url = \"{}\"\n", server.base_url()))
    }

    /// Creates an environment with a config pointing at a closed port.
    ///
    /// For commands that must fail before any request is sent.
    pub fn offline() -> Self {
        Self::with_config("base_url = \"http://127.0.0.1:9/api\"\ntimeout_secs = 1\n")
    }

    /// Creates an environment with the given config file contents.
    pub fn with_config(contents: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, contents).expect("Failed to write config file");
        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    /// Returns the path of the config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Appends a line to the config file.
    pub fn append_config(&self, line: &str) {
        let mut contents = std::fs::read_to_string(&self.config_path).expect("Failed to read config");
        contents.push_str(line);
        contents.push('\n');
        std::fs::write(&self.config_path, contents).expect("Failed to write config file");
    }

    /// Creates a NotehubCommand configured for this test environment.
    pub fn cmd(&self) -> NotehubCommand {
        NotehubCommand::new().config(&self.config_path)
    }
}
