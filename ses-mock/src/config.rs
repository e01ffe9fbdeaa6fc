//! Configuration for ses-mock

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SesError};

/// Main service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SesMockConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Sending quota
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Warm-up schedule
    #[serde(default)]
    pub warmup: WarmupConfig,
    /// Verified sender identities
    #[serde(default = "default_identities")]
    pub identities: Vec<String>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:8080")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

/// Sending quota configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuotaConfig {
    /// Maximum sends per 24 hours
    #[serde(default = "default_max_24_hour_send")]
    pub max_24_hour_send: u64,
    /// Maximum sends per second, 0 disables throttling
    #[serde(default = "default_max_send_rate")]
    pub max_send_rate: f64,
    #[serde(default = "default_true")]
    pub sending_enabled: bool,
}

/// Warm-up configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WarmupConfig {
    /// Start in warm-up mode. When false the account is warmed up from the start.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Daily limit on day 1
    #[serde(default = "default_initial_daily_limit")]
    pub initial_daily_limit: u64,
    /// Daily limit multiplier per day
    #[serde(default = "default_increase_factor")]
    pub increase_factor: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_24_hour_send() -> u64 {
    50_000
}

fn default_max_send_rate() -> f64 {
    14.0
}

fn default_initial_daily_limit() -> u64 {
    50
}

fn default_increase_factor() -> f64 {
    1.5
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_identities() -> Vec<String> {
    vec!["domain.com".to_string(), "test@domain.com".to_string()]
}

impl Default for SesMockConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            quota: QuotaConfig::default(),
            warmup: WarmupConfig::default(),
            identities: default_identities(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_24_hour_send: default_max_24_hour_send(),
            max_send_rate: default_max_send_rate(),
            sending_enabled: true,
        }
    }
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_daily_limit: default_initial_daily_limit(),
            increase_factor: default_increase_factor(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SesMockConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SesError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SesError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server.listen_addr.parse().map_err(|e| {
            SesError::Config(format!(
                "Invalid listen address '{}': {}",
                self.server.listen_addr, e
            ))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        if !self.quota.max_send_rate.is_finite() || self.quota.max_send_rate < 0.0 {
            return Err(SesError::Config(format!(
                "max_send_rate must be a non-negative number, got {}",
                self.quota.max_send_rate
            )));
        }

        if self.quota.max_send_rate > 0.0
            && Duration::try_from_secs_f64(1.0 / self.quota.max_send_rate).is_err()
        {
            return Err(SesError::Config(format!(
                "max_send_rate {} is too small to express as a send interval",
                self.quota.max_send_rate
            )));
        }

        if !self.warmup.increase_factor.is_finite() || self.warmup.increase_factor < 1.0 {
            return Err(SesError::Config(format!(
                "increase_factor must be at least 1.0, got {}",
                self.warmup.increase_factor
            )));
        }

        if self.identities.is_empty() {
            return Err(SesError::Config("No identities configured".to_string()));
        }

        Ok(())
    }
}
