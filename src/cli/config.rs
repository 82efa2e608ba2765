//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::BrowserOptions;
use crate::transport::DEFAULT_BASE_URL;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "NOTEHUB_TOKEN";

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "NOTEHUB_CONFIG";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from config file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API base URL
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// Notes per page
    pub per_page: Option<u32>,

    /// Search debounce window in milliseconds
    pub debounce_ms: Option<u64>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Seconds after which a cached page is refetched on next view
    pub stale_after_secs: Option<u64>,
}

impl Config {
    /// Load configuration.
    ///
    /// Location precedence:
    /// 1. `path` (the `--config` flag); must exist
    /// 2. `$NOTEHUB_CONFIG`; must exist
    /// 3. The default config file; a missing file yields the default config
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }

        let config_path = Self::config_path();
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/notehub/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notehub")
            .join("config.toml")
    }

    /// Resolve the API base URL.
    ///
    /// Precedence order:
    /// 1. CLI `--base-url` argument
    /// 2. Config file `base_url` setting
    /// 3. The public notes API
    pub fn base_url(&self, cli_base_url: Option<&str>) -> String {
        cli_base_url
            .map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Resolve the bearer token.
    ///
    /// Precedence order:
    /// 1. CLI `--token` argument
    /// 2. $NOTEHUB_TOKEN environment variable
    /// 3. Config file `token` setting
    pub fn token(&self, cli_token: Option<&str>) -> Option<String> {
        self.resolve_token(cli_token, std::env::var(TOKEN_ENV).ok())
    }

    fn resolve_token(&self, cli_token: Option<&str>, env_token: Option<String>) -> Option<String> {
        cli_token
            .map(str::to_string)
            .or(env_token)
            .or_else(|| self.token.clone())
            .filter(|t| !t.trim().is_empty())
    }

    /// Resolve the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    /// Resolve the list session options, with CLI `--per-page` taking precedence.
    pub fn browser_options(&self, cli_per_page: Option<u32>) -> BrowserOptions {
        let defaults = BrowserOptions::default();
        BrowserOptions {
            per_page: cli_per_page
                .or(self.per_page)
                .unwrap_or(defaults.per_page)
                .max(1),
            debounce: self
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            stale_after: self.stale_after_secs.map(Duration::from_secs),
        }
    }
}
