//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Banking calendar configuration.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Upstream ledger API configuration.
    pub upstream: UpstreamConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Banking calendar configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA timezone every report boundary is anchored to.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Recurring non-banking days as a comma separated `DD-MM` list.
    #[serde(default)]
    pub holidays: String,
    /// Local hour at which the settlement day rolls over.
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            holidays: String::new(),
            cutoff_hour: default_cutoff_hour(),
        }
    }
}

impl CalendarConfig {
    /// Returns the raw holiday entries, trimmed and without blanks.
    #[must_use]
    pub fn holiday_entries(&self) -> Vec<&str> {
        self.holidays
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    }
}

fn default_timezone() -> String {
    "America/Santiago".to_string()
}

fn default_cutoff_hour() -> u32 {
    14
}

/// Upstream ledger API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URI of the transactions API.
    pub data_uri: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per page before a report is aborted.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Rows requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    5
}

fn default_page_size() -> u32 {
    1000
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PAYREPORT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
