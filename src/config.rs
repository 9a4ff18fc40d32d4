//! Environment-driven application configuration.

use anyhow::{Context, Result};
use figment::providers::Env;
use figment::Figment;
use serde::Deserialize;
use std::time::Duration;

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_catalog_ttl() -> u64 {
    3600
}

fn default_browse_ttl() -> u64 {
    300
}

fn default_shutdown_timeout() -> u64 {
    10
}

fn default_latest_songs_limit() -> i64 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    pub database_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// TTL in seconds for whole-catalog listings (genres, artists, songs).
    #[serde(default = "default_catalog_ttl")]
    pub catalog_ttl_seconds: u64,
    /// TTL in seconds for per-slug browse lookups.
    #[serde(default = "default_browse_ttl")]
    pub browse_ttl_seconds: u64,
    /// How long to let in-flight connections drain on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
    /// Row cap for the latest-songs listing.
    #[serde(default = "default_latest_songs_limit")]
    pub latest_songs_limit: i64,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Figment::new()
            .merge(Env::raw())
            .extract()
            .context("Failed to load config")
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_seconds)
    }

    pub fn browse_ttl(&self) -> Duration {
        Duration::from_secs(self.browse_ttl_seconds)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }
}
