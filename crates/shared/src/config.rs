//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Background reclamation configuration.
    #[serde(default)]
    pub reclamation: ReclamationConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Background reclamation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReclamationConfig {
    /// Interval between guest-expiry sweeps, in seconds.
    #[serde(default = "default_guest_sweep_interval")]
    pub guest_sweep_interval_secs: u64,
    /// Whether the free-tier retention sweep runs at all.
    #[serde(default = "default_retention_enabled")]
    pub retention_enabled: bool,
}

fn default_guest_sweep_interval() -> u64 {
    3600 // hourly
}

fn default_retention_enabled() -> bool {
    true
}

impl Default for ReclamationConfig {
    fn default() -> Self {
        Self {
            guest_sweep_interval_secs: default_guest_sweep_interval(),
            retention_enabled: default_retention_enabled(),
        }
    }
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
            .add_source(config::Environment::with_prefix("MONEDERO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
