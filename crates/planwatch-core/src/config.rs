//! Client configuration.
//!
//! Every field has a default matching the reference deployment, so an empty
//! or missing config file is valid. Values are read from JSON:
//!
//! ```json
//! {
//!   "endpoints": { "host": "10.0.0.5", "port": 18080 },
//!   "polling": { "max_retries": 5 }
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Port the backend listens on in the reference deployment.
pub const DEFAULT_PORT: u16 = 18080;

/// Top-level configuration for a planwatch client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoints: EndpointConfig,
    pub polling: PollingConfig,
    pub chat: ChatConfig,
}

/// Where the backend may be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Scheme of the explicitly configured base URL
    pub scheme: String,
    /// Host of the explicitly configured base URL
    pub host: String,
    /// Port of the explicitly configured base URL
    pub port: u16,
    /// Origin the client was served from, if any (e.g. `http://host:8080`)
    pub origin: Option<String>,
    /// Port used by the last-resort literal candidate
    pub fallback_port: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            origin: None,
            fallback_port: DEFAULT_PORT,
        }
    }
}

/// Timing and retry policy of the status poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub base_interval_ms: u64,
    pub backoff_interval_ms: u64,
    pub backoff_cooldown_ms: u64,
    /// Consecutive failures tolerated before backing off
    pub max_retries: u32,
    /// Grace period between stopping and hiding the status panel
    pub hide_delay_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 1_000,
            backoff_interval_ms: 3_000,
            backoff_cooldown_ms: 5_000,
            max_retries: 3,
            hide_delay_ms: 10_000,
        }
    }
}

impl PollingConfig {
    pub fn base_interval(&self) -> Duration {
        Duration::from_millis(self.base_interval_ms)
    }

    pub fn backoff_interval(&self) -> Duration {
        Duration::from_millis(self.backoff_interval_ms)
    }

    pub fn backoff_cooldown(&self) -> Duration {
        Duration::from_millis(self.backoff_cooldown_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    /// Rejects zero intervals, which `tokio::time::interval` cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.base_interval_ms == 0 || self.backoff_interval_ms == 0 {
            return Err(ClientError::configuration(
                "polling intervals must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Chat request policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Upper bound on a single chat request
    pub timeout_secs: u64,
    /// How long polling continues after a successful reply before stopping
    pub completion_linger_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            completion_linger_ms: 3_000,
        }
    }
}

impl ChatConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn completion_linger(&self) -> Duration {
        Duration::from_millis(self.completion_linger_ms)
    }
}

impl ClientConfig {
    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::FileSystem` if the file cannot be read and
    /// `ClientError::Serialization` if it is not valid config JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| ClientError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Loads configuration from `path`, or from the XDG default location when
    /// no path is given. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = Self::default_config_path()?;
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config path following the XDG Base Directory
    /// specification: `$XDG_CONFIG_HOME/planwatch/config.json`.
    pub fn default_config_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("planwatch")
            .get_config_file("config.json")
            .ok_or_else(|| ClientError::XdgDirectory("no config home available".to_string()))
    }
}
