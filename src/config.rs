// src/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source gateway settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Store gateway settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Sync run settings
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.base_url.trim().is_empty() {
            return Err(AppError::config("source.base_url is empty"));
        }
        if self.store.base_url.trim().is_empty() {
            return Err(AppError::config("store.base_url is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::config("source.timeout_secs must be > 0"));
        }
        if self.source.retry_attempts == 0 {
            return Err(AppError::config("source.retry_attempts must be > 0"));
        }
        if self.sync.chunk_size == 0 {
            return Err(AppError::config("sync.chunk_size must be > 0"));
        }
        Ok(())
    }
}

/// Source gateway HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the source API
    #[serde(default)]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Attempt ceiling for retryable failures
    #[serde(default = "defaults::retry_attempts")]
    pub retry_attempts: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "defaults::retry_delay")]
    pub retry_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            retry_attempts: defaults::retry_attempts(),
            retry_delay_ms: defaults::retry_delay(),
        }
    }
}

/// Store gateway HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store API
    #[serde(default)]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Sync run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Number of groups synced concurrently per chunk
    #[serde(default = "defaults::chunk_size")]
    pub chunk_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            chunk_size: defaults::chunk_size(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "schedule-sync/0.1".to_string()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn retry_attempts() -> u32 {
        3
    }

    pub fn retry_delay() -> u64 {
        500
    }

    pub fn chunk_size() -> usize {
        crate::sync::DEFAULT_CHUNK_SIZE
    }
}
