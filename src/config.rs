//! Client configuration.
//!
//! Resolution order (later wins):
//! 1. Built-in defaults
//! 2. JSON config file: `$ZILRPC_CONFIG`, else `<config_dir>/zilrpc/config.json`
//! 3. Environment: `ZILRPC_BASE_URL`, `ZILRPC_TIMEOUT_SECS`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default transport timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_CONFIG_PATH: &str = "ZILRPC_CONFIG";
pub const ENV_BASE_URL: &str = "ZILRPC_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ZILRPC_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid base URL {0:?}: {1}")]
    BaseUrl(String, url::ParseError),

    #[error("Invalid timeout {0:?}: expected a positive whole number of seconds")]
    Timeout(String),
}

/// Settings for the HTTP transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL that relative endpoints are resolved against.
    pub base_url: Option<Url>,
    /// Transport timeout; the only bound on a call's duration.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("zilrpc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// On-disk representation; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

/// Resolve the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|dir| dir.join("zilrpc").join("config.json"))
}

impl ClientConfig {
    /// Load defaults, then the default config file, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match default_config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: ConfigFile =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("Loaded config from {}", path.display());

        let mut config = Self::default();
        if let Some(base_url) = file.base_url {
            config.base_url = Some(parse_base_url(&base_url)?);
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = timeout_from_secs(secs, &secs.to_string())?;
        }
        if let Some(user_agent) = file.user_agent {
            config.user_agent = user_agent;
        }
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(parse_base_url(&base_url)?);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let parsed = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::Timeout(secs.clone()))?;
            self.timeout = timeout_from_secs(parsed, &secs)?;
        }
        Ok(())
    }
}

/// A zero timeout would make reqwest fail every request before it is sent.
fn timeout_from_secs(secs: u64, raw: &str) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Timeout(raw.to_string()));
    }
    Ok(Duration::from_secs(secs))
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::BaseUrl(raw.to_string(), e))
}
