use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::{DEFAULT_TIMEOUT_SECONDS, TRACKING_URL_TEMPLATE, USER_AGENT};
use crate::error::{Result, TrackerError};
use crate::normalize::Zone;
use crate::types::OutputFormat;

/// Settings read from an optional TOML file; command-line flags override them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IANA zone name used for every timestamp; unset means the system zone
    pub time_zone: Option<String>,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Must contain `{number}` and `{carrier}`
    pub endpoint: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: USER_AGENT.to_string(),
            endpoint: TRACKING_URL_TEMPLATE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            return Err(TrackerError::Config("http.timeout_seconds must be positive".into()));
        }
        for placeholder in ["{number}", "{carrier}"] {
            if !self.http.endpoint.contains(placeholder) {
                return Err(TrackerError::Config(format!(
                    "http.endpoint is missing the {} placeholder",
                    placeholder
                )));
            }
        }
        Ok(())
    }

    /// Resolve the configured zone name.
    pub fn zone(&self) -> Result<Zone> {
        Zone::from_name(self.time_zone.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }
}
