//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CRM_HOST` - Bind address (default: 127.0.0.1)
//! - `CRM_PORT` - Listen port (default: 8080)
//! - `CRM_PAGE_SIZE` - Default customer table page size (default: 10)
//! - `CRM_MAX_PAGE_SIZE` - Largest page size a request may ask for (default: 100)
//! - `CRM_SEED_CUSTOMERS` - Sample customers generated at startup (default: 33, 0 disables)
//! - `CRM_CREDENTIALS_FILE` - JSON credential file; unset keeps credentials in memory
//! - `CRM_REMINDER_DAYS` - Days ahead that filter replacements are listed as due (default: 30)
//! - `CRM_LOG_FORMAT` - `text` or `json` (default: text)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Rows per page in the customer table.
pub const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_MAX_PAGE_SIZE: usize = 100;
/// Sample customers generated on startup.
pub const DEFAULT_SEED_CUSTOMERS: usize = 33;
const DEFAULT_REMINDER_DAYS: u32 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct CrmConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Page size used when a request does not give one
    pub page_size: usize,
    /// Upper bound for a requested page size
    pub max_page_size: usize,
    /// Number of sample customers to generate at startup
    pub seed_customers: usize,
    /// Credential file; `None` keeps the credential map in memory
    pub credentials_file: Option<PathBuf>,
    /// Reminder window for consumable replacements, in days
    pub reminder_days: u32,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            seed_customers: DEFAULT_SEED_CUSTOMERS,
            credentials_file: None,
            reminder_days: DEFAULT_REMINDER_DAYS,
            log_format: LogFormat::Text,
        }
    }
}

impl CrmConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or(&lookup, "CRM_HOST", defaults.host)?;
        let port = parse_or(&lookup, "CRM_PORT", defaults.port)?;
        let page_size = parse_or(&lookup, "CRM_PAGE_SIZE", defaults.page_size)?;
        let max_page_size = parse_or(&lookup, "CRM_MAX_PAGE_SIZE", defaults.max_page_size)?;
        let seed_customers = parse_or(&lookup, "CRM_SEED_CUSTOMERS", defaults.seed_customers)?;
        let credentials_file = get_optional_env(&lookup, "CRM_CREDENTIALS_FILE").map(PathBuf::from);
        let reminder_days = parse_or(&lookup, "CRM_REMINDER_DAYS", defaults.reminder_days)?;
        let log_format = parse_or(&lookup, "CRM_LOG_FORMAT", defaults.log_format)?;

        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CRM_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if max_page_size < page_size {
            return Err(ConfigError::InvalidEnvVar(
                "CRM_MAX_PAGE_SIZE".to_string(),
                format!("must be at least CRM_PAGE_SIZE ({page_size})"),
            ));
        }

        Ok(Self {
            host,
            port,
            page_size,
            max_page_size,
            seed_customers,
            credentials_file,
            reminder_days,
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Clamp a requested page size into `1..=max_page_size`, falling back to
    /// the configured default when none was given.
    #[must_use]
    pub fn effective_page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

/// Get an optional variable, treating an empty value as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Parse a variable, falling back to `default` when it is unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(lookup, key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
