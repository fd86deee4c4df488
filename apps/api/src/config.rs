//! # API Configuration
//!
//! Server, database and exchange-rate settings.
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults            ApiConfig::default()                            │
//! │  2. TOML file           $RURALIS_CONFIG                                 │
//! │                         or <platform config dir>/ruralis.toml           │
//! │  3. Environment         RURALIS_BIND_ADDR, RURALIS_PORT,                │
//! │                         RURALIS_DATABASE_PATH, RURALIS_EXCHANGE_URL,    │
//! │                         RURALIS_FALLBACK_RATE,                          │
//! │                         RURALIS_EXCHANGE_TIMEOUT_SECS                   │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example File
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 8000
//!
//! [database]
//! path = "/var/lib/ruralis/ruralis.db"
//! max_connections = 5
//!
//! [exchange]
//! url = "https://api.exchangerate-api.com/v4/latest/ARS"
//! fallback_rate = 0.001
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use ruralis_core::{ExchangeRate, DEFAULT_FALLBACK_RATE};
use ruralis_db::DbConfig;

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "RURALIS_CONFIG";

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "ruralis.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but can't be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`ApiConfig`].
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns `addr:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// SQLite settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./ruralis.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Exchange-rate lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSettings {
    /// Endpoint returning `{"rates": {"USD": <number>}}` for base ARS.
    #[serde(default = "default_exchange_url")]
    pub url: String,

    /// USD per ARS used whenever the lookup fails.
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_exchange_url() -> String {
    "https://api.exchangerate-api.com/v4/latest/ARS".to_string()
}

fn default_fallback_rate() -> f64 {
    DEFAULT_FALLBACK_RATE
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        ExchangeSettings {
            url: default_exchange_url(),
            fallback_rate: default_fallback_rate(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ExchangeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The validated fallback rate.
    pub fn fallback(&self) -> ConfigResult<ExchangeRate> {
        ExchangeRate::new(self.fallback_rate).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "exchange.fallback_rate must be a positive number, got {}",
                self.fallback_rate
            ))
        })
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Complete API configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub exchange: ExchangeSettings,
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// `config_path` wins over `RURALIS_CONFIG`, which wins over the
    /// platform config directory. A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_toml(&std::fs::read_to_string(&path)?)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; missing sections and keys take defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr must not be empty".into()));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if !self.exchange.url.starts_with("http://") && !self.exchange.url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "exchange.url must start with http:// or https://, got: {}",
                self.exchange.url
            )));
        }

        if self.exchange.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "exchange.timeout_secs must be greater than 0".into(),
            ));
        }

        self.exchange.fallback()?;

        Ok(())
    }

    /// Applies `RURALIS_*` overrides read through `lookup`.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("RURALIS_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("RURALIS_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(value = %port, "Ignoring invalid RURALIS_PORT"),
            }
        }

        if let Some(path) = lookup("RURALIS_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(url) = lookup("RURALIS_EXCHANGE_URL") {
            debug!(url = %url, "Overriding exchange URL from environment");
            self.exchange.url = url;
        }

        if let Some(rate) = lookup("RURALIS_FALLBACK_RATE") {
            match rate.parse::<f64>() {
                Ok(r) => self.exchange.fallback_rate = r,
                Err(_) => warn!(value = %rate, "Ignoring invalid RURALIS_FALLBACK_RATE"),
            }
        }

        if let Some(secs) = lookup("RURALIS_EXCHANGE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.exchange.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid RURALIS_EXCHANGE_TIMEOUT_SECS"),
            }
        }
    }

    /// Database pool configuration for [`ruralis_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database.path).max_connections(self.database.max_connections)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("ar", "ruralis", "ruralis")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
