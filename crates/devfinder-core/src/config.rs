//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Backend base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Default HTTP request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings for one session coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without trailing slash
    pub base_url: String,
    /// Per-request timeout for the HTTP transport
    pub timeout_ms: u64,
    /// Keep the previous request token when a search is resubmitted with an
    /// identical normalized payload
    pub skip_identical_resubmit: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            skip_identical_resubmit: false,
        }
    }
}

impl ClientConfig {
    /// Load a config file; missing fields take their defaults.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;
        let config: ClientConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_skip_identical_resubmit(mut self, skip: bool) -> Self {
        self.skip_identical_resubmit = skip;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check values a transport cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "baseUrl".to_string(),
                message: format!("'{}' is not an http(s) URL", self.base_url),
            });
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeoutMs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Get the default data directory for devfinder tools.
pub fn default_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "devfinder", "devfinder")
        .map(|dirs| dirs.data_dir().to_path_buf())
}
