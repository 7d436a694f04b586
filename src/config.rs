use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::browser::scanner::DEFAULT_MAX_DEPTH;

#[derive(Error, Debug, PartialEq)]
#[error("Config error: {key} must be valid (got '{value}')")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

// --- CONFIG AGGREGATOR ---

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub naming: NamingConfig,
    pub broker: BrokerConfig,
}

impl Config {
    /// Reads `.env` (if any) then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key source; missing keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::load(&lookup)?,
            naming: NamingConfig::load(&lookup)?,
            broker: BrokerConfig::load(&lookup),
        })
    }
}

// --- MODULES ---

// SERVER
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host:               get_env(lookup, "SERVER_HOST", "127.0.0.1")?,
            port:               get_env(lookup, "SERVER_PORT", "8080")?,
            log_level:          get_env(lookup, "BROWSER_LOG", "info")?,
            request_timeout_ms: get_env(lookup, "REQUEST_TIMEOUT_MS", "30000")?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// NAMING
#[derive(Debug, Clone)]
pub struct NamingConfig {
    /// Directory name the connection factory is bound under.
    pub factory_name: String,
    /// Where queue discovery starts; empty is the namespace root.
    pub scan_root: String,
    pub scan_max_depth: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            factory_name: "ConnectionFactory".to_string(),
            scan_root: String::new(),
            scan_max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl NamingConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_depth = DEFAULT_MAX_DEPTH.to_string();
        Ok(Self {
            factory_name:   get_env(lookup, "NAMING_FACTORY_NAME", "ConnectionFactory")?,
            scan_root:      get_env(lookup, "NAMING_SCAN_ROOT", "")?,
            scan_max_depth: get_env(lookup, "SCAN_MAX_DEPTH", &max_depth)?,
        })
    }
}

// BROKER
#[derive(Debug, Clone, Default)]
pub struct BrokerConfig {
    /// JSON fixture seeding the embedded broker and directory.
    pub fixture_path: Option<String>,
}

impl BrokerConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            fixture_path: lookup("BROKER_FIXTURE_PATH").filter(|p| !p.trim().is_empty()),
        }
    }
}

// --- PRIVATE HELPER ---

fn get_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    value.parse().map_err(|_| ConfigError { key, value })
}
