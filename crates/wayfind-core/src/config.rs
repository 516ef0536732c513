//! Application configuration management.
//!
//! This module handles loading the configuration: the API base URL, an
//! optional bearer token, the cache time-to-live and the request timeout.
//!
//! Configuration is stored at `~/.config/wayfind/config.json`; any field can
//! be overridden with a `WAYFIND_*` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::client::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::api::HttpRemote;
use crate::cache::DEFAULT_TTL_SECS;

/// Application name used for config directory paths
const APP_NAME: &str = "wayfind";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_BASE_URL: &str = "https://api.wayfind.app/v1";

/// One year
const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

const ENV_BASE_URL: &str = "WAYFIND_BASE_URL";
const ENV_API_TOKEN: &str = "WAYFIND_API_TOKEN";
const ENV_CACHE_TTL_SECS: &str = "WAYFIND_CACHE_TTL_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub api_token: Option<String>,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            cache_ttl_secs: DEFAULT_TTL_SECS as u64,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the config file (if any), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            debug!(path = %path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `WAYFIND_*` overrides looked up through `var`.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(token) = var(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token.trim().to_string());
        }
        if let Some(raw) = var(ENV_CACHE_TTL_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.cache_ttl_secs = secs,
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_CACHE_TTL_SECS),
            }
        }
    }

    /// Cache time-to-live, capped at `MAX_CACHE_TTL_SECS`.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs.min(MAX_CACHE_TTL_SECS) as i64)
    }

    /// Request timeout; 0 means the default rather than "fail immediately".
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Build the HTTP remote described by this config.
    pub fn build_remote(&self) -> Result<HttpRemote> {
        let mut remote = HttpRemote::new(self.base_url.clone(), self.request_timeout())
            .context("Failed to build HTTP client")?;
        if let Some(ref token) = self.api_token {
            remote.set_token(token.clone());
        }
        Ok(remote)
    }
}
