//! Server configuration
//!
//! Read from the environment (optionally seeded from `.env.local`):
//! - DATA_DIR: directory the trading bot writes its snapshots into
//! - STATIC_DIR: directory served under /static
//! - SERVER_PORT: listen port
//! - REFRESH_POLL_SECS: data-directory poll period, 0 disables polling
//! - STATUS_FILE: one-line bot status shown in page headers

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_POLL_SECS: u64 = 5;

/// Runtime configuration for the dashboard server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub port: u16,
    /// `None` when polling is disabled
    pub refresh_poll: Option<Duration>,
    pub status_file: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            port: DEFAULT_PORT,
            refresh_poll: Some(Duration::from_secs(DEFAULT_POLL_SECS)),
            status_file: PathBuf::from("status.txt"),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("STATUS_FILE") {
            config.status_file = PathBuf::from(file);
        }
        if let Some(port) = lookup("SERVER_PORT") {
            config.port = parse_number("SERVER_PORT", &port)?;
        }
        if let Some(secs) = lookup("REFRESH_POLL_SECS") {
            let secs: u64 = parse_number("REFRESH_POLL_SECS", &secs)?;
            config.refresh_poll = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var: var.to_string(),
        value: value.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: String, value: String },
}
