//! Runtime configuration
//!
//! Load order: built-in defaults, `~/.warstatus/config.json`, then
//! `WARSTATUS_*` environment variables, then command-line `Overrides`.
//! Validation runs once, on the merged result.

use crate::types::{Result, WarStatusError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Community API root
pub const DEFAULT_BASE_URL: &str = "https://api.helldivers2.dev/api";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// Sent as `X-Super-Client`
    pub client_name: String,
    /// Sent as `X-Super-Contact`
    pub contact: String,
    pub max_calls: usize,
    pub window_ms: u64,
    pub buffer_ms: u64,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
}

/// Values given on the command line; they win over file and environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_name: "warstatus".to_string(),
            contact: "warstatus".to_string(),
            max_calls: 5,
            window_ms: 10_000,
            buffer_ms: 1_000,
            request_timeout_secs: 10,
            poll_interval_secs: 60,
        }
    }
}

impl Config {
    /// Load from the default path, environment, then `overrides`, and validate the result
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let path = Self::default_path();
        if path.is_none() {
            warn!("Could not determine home directory, using default config");
        }
        Self::resolve(path.as_deref(), |key| env::var(key).ok(), overrides)
    }

    /// Full load order against an explicit file and environment
    pub fn resolve<F>(path: Option<&Path>, lookup: F, overrides: &Overrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Read a config file; a missing file yields defaults
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            WarStatusError::Config(format!("Invalid config {}: {}", path.display(), e))
        })
    }

    /// `~/.warstatus/config.json`
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|d| d.home_dir().join(".warstatus").join("config.json"))
    }

    /// Apply `WARSTATUS_*` overrides using `lookup` as the environment
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WARSTATUS_BASE_URL") {
            self.base_url = url;
        }
        if let Some(client) = lookup("WARSTATUS_CLIENT") {
            self.client_name = client;
        }
        if let Some(contact) = lookup("WARSTATUS_CONTACT") {
            self.contact = contact;
        }
        if let Some(raw) = lookup("WARSTATUS_TIMEOUT_SECS") {
            self.request_timeout_secs = raw.trim().parse().map_err(|e| {
                WarStatusError::Config(format!("Invalid WARSTATUS_TIMEOUT_SECS '{}': {}", raw, e))
            })?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.base_url {
            self.base_url = url.clone();
        }
        if let Some(timeout) = overrides.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(WarStatusError::Config("base_url must not be empty".into()));
        }
        if self.max_calls == 0 {
            return Err(WarStatusError::Config("max_calls must be at least 1".into()));
        }
        if self.window_ms == 0 {
            return Err(WarStatusError::Config("window_ms must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(WarStatusError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn buffer(&self) -> Duration {
        Duration::from_millis(self.buffer_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
