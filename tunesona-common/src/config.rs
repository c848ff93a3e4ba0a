//! Configuration loading and config file resolution
//!
//! Config file location follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`TUNESONA_CONFIG`)
//! 3. Platform config directory (`<config_dir>/tunesona/config.toml`)
//!
//! A missing file is not fatal: a warning is logged and compiled defaults are
//! used. A file that exists but does not parse is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TUNESONA_CONFIG";

/// Default music API host
pub const DEFAULT_API_BASE_URL: &str = "https://api.music.apple.com";

/// Default storefront locale sent as `l=` on every request
pub const DEFAULT_LOCALE: &str = "en-us";

/// Default HTTP timeout applied by the network client layer
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub query: QuerySettings,
    pub credential: CredentialSettings,
    pub logging: LoggingConfig,
}

/// `[api]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Music API host, without trailing slash
    pub base_url: String,
    /// Signed developer token; when absent the user credential is sent as the bearer
    pub developer_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            developer_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[query]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub locale: String,
    /// Result-count limit for library and history collections
    pub limit: Option<u32>,
    /// Result-count limit for heavy rotation
    pub heavy_rotation_limit: Option<u32>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            limit: None,
            heavy_rotation_limit: None,
        }
    }
}

/// `[credential]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    /// User token, lowest priority credential source
    pub user_token: Option<String>,
    /// Path of the local token store (defaults to the data directory)
    pub token_store: Option<PathBuf>,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the client layer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url must not be empty".to_string()));
        }
        if self.query.locale.trim().is_empty() {
            return Err(Error::Config("query.locale must not be empty".to_string()));
        }
        if self.query.limit == Some(0) || self.query.heavy_rotation_limit == Some(0) {
            return Err(Error::Config("query limits must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Token store path, falling back to the platform data directory
    pub fn token_store_path(&self) -> PathBuf {
        self.credential
            .token_store
            .clone()
            .unwrap_or_else(default_token_store_path)
    }
}

/// Resolves which config file to load
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Config file path by priority: CLI, environment, platform default
    pub fn resolve_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_path()
    }

    /// Load the resolved config, degrading to defaults when the file is missing
    pub fn load(&self) -> Result<TomlConfig> {
        let Some(path) = self.resolve_path() else {
            warn!("Could not determine config directory, using default configuration");
            return Ok(TomlConfig::default());
        };

        load_toml_config(&path)
    }
}

/// Load a config file; a missing file yields defaults
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using default configuration",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config {} failed: {}", path.display(), e)))?;
    let config = TomlConfig::from_toml_str(&content)
        .map_err(|e| Error::Config(format!("Parse config {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Write a config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;

    debug!("Wrote configuration to {}", path.display());
    Ok(())
}

/// `<config_dir>/tunesona/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunesona").join("config.toml"))
}

/// `<data_local_dir>/tunesona/token.json`
pub fn default_token_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tunesona"))
        .unwrap_or_else(|| PathBuf::from("./tunesona_data"))
        .join("token.json")
}
