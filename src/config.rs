use crate::error::{Result, SubhubError};
use crate::subscription::warp;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Compiled-in conversion service host, used when neither the link store
/// nor the environment provide one
pub const DEFAULT_SUB_API: &str = "api.v1.mk";

/// Compiled-in client configuration passed to the conversion service
pub const DEFAULT_SUB_CONFIG: &str =
    "https://raw.githubusercontent.com/cmliu/ACL4SSR/main/Clash/config/ACL4SSR_Online_MultiCountry.ini";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Conversion service configuration
    pub converter: ConverterConfig,
    /// Subscription source fetching
    pub fetch: FetchConfig,
    /// Subscription presentation and extra sources
    pub subscription: SubscriptionConfig,
    /// Where links come from when no database is configured
    pub links: LinkSourceConfig,
    /// Database configuration (only when DB_HOST is set)
    pub database: Option<DatabaseConfig>,
    /// Logging configuration
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server (default: 8080)
    pub port: u16,
    /// Host to bind to (default: 0.0.0.0)
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Conversion service host, with or without scheme
    pub api: String,
    /// Client configuration URL forwarded as `config`
    pub config_url: String,
    /// Timeout for the conversion call in seconds
    pub timeout: u64,
}

impl ConverterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            api: DEFAULT_SUB_API.to_string(),
            config_url: DEFAULT_SUB_CONFIG.to_string(),
            timeout: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-source request timeout in seconds
    pub timeout: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    /// Display name of the subscription
    pub name: String,
    /// Normalized WARP entries appended to every descriptor
    pub warp: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LinkSourceConfig {
    /// JSON file holding an array of links
    pub file: Option<PathBuf>,
    /// Newline-delimited link URLs
    pub inline: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Database name
    pub name: String,
    /// SSL mode (disable, require, prefer)
    pub ssl_mode: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Minimum connections in pool
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Get the database connection URL
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            server: ServerConfig {
                port: get_env_or("SUBHUB_PORT", "8080").parse().map_err(|_| {
                    SubhubError::InvalidConfig("SUBHUB_PORT must be a valid port number".into())
                })?,
                host: get_env_or("SUBHUB_HOST", "0.0.0.0"),
            },
            converter: ConverterConfig {
                api: get_env_non_empty_or("SUBAPI", DEFAULT_SUB_API),
                config_url: get_env_non_empty_or("SUBCONFIG", DEFAULT_SUB_CONFIG),
                timeout: parse_secs("CONVERTER_TIMEOUT", "10")?,
            },
            fetch: FetchConfig {
                timeout: parse_secs("FETCH_TIMEOUT", "5")?,
            },
            subscription: SubscriptionConfig {
                name: get_env_non_empty_or("SUBNAME", "Subscription"),
                warp: env::var("WARP")
                    .map(|raw| warp::normalize(&raw))
                    .unwrap_or_default(),
            },
            links: LinkSourceConfig {
                file: env::var("LINKS_FILE")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
                inline: env::var("LINKS").ok().filter(|s| !s.trim().is_empty()),
            },
            database: parse_database()?,
            log: LogConfig {
                level: get_env_or("LOG_LEVEL", "info"),
                format: get_env_or("LOG_FORMAT", "json"),
            },
        })
    }

    /// Get the HTTP server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_database() -> Result<Option<DatabaseConfig>> {
    let host = env::var("DB_HOST").unwrap_or_default();
    if host.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(DatabaseConfig {
        host,
        port: get_env_or("DB_PORT", "5432").parse().map_err(|_| {
            SubhubError::InvalidConfig("DB_PORT must be a valid port number".into())
        })?,
        user: get_env_or("DB_USER", "subhub"),
        password: get_env_or("DB_PASSWORD", "subhub_password"),
        name: get_env_or("DB_NAME", "subhub"),
        ssl_mode: get_env_or("DB_SSLMODE", "disable"),
        max_connections: get_env_or("DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|_| {
                SubhubError::InvalidConfig("DB_MAX_CONNECTIONS must be a valid number".into())
            })?,
        min_connections: get_env_or("DB_MIN_CONNECTIONS", "1").parse().map_err(|_| {
            SubhubError::InvalidConfig("DB_MIN_CONNECTIONS must be a valid number".into())
        })?,
    }))
}

fn parse_secs(key: &str, default: &str) -> Result<u64> {
    let secs: u64 = get_env_or(key, default).parse().map_err(|_| {
        SubhubError::InvalidConfig(format!("{} must be a whole number of seconds", key))
    })?;
    if secs == 0 {
        return Err(SubhubError::InvalidConfig(format!(
            "{} must be greater than zero",
            key
        )));
    }
    Ok(secs)
}

/// Get environment variable with a default value
fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Like `get_env_or`, but an empty value also falls back to the default
fn get_env_non_empty_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
