// ABOUTME: Configuration loading for hookchat.
// ABOUTME: Reads ~/.config/hookchat/config.toml and applies CLI/env overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::webhook::{DEFAULT_USER_ID, HttpMethod};

const APP_DIR: &str = "hookchat";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub webhook: WebhookConfig,
    pub chat: ChatConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Where and how to reach the workflow webhook.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub url: String,
    pub method: HttpMethod,
    pub user_id: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5678/webhook/chat".to_string(),
            method: HttpMethod::Post,
            user_id: DEFAULT_USER_ID.to_string(),
            timeout_seconds: None,
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Chat presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: "Hey! Send me a message and let's get started.".to_string(),
        }
    }
}

/// Storage location override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Values from the command line that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub webhook_url: Option<String>,
    pub method: Option<HttpMethod>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from `path` (or the default location), falling back to defaults
    /// when the file does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Apply method and data-dir overrides. The webhook URL override is applied
    /// by the controller since it must beat the stored URL too.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(method) = overrides.method {
            self.webhook.method = method;
        }
        if let Some(dir) = &overrides.data_dir {
            self.storage.data_dir = Some(dir.clone());
        }
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Directory holding the state file and logs.
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    /// Path to the key-value state file.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir().join("state.json")
    }

    /// Path to the log file.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("hookchat.log")
    }
}
