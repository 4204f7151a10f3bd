// src/error.rs

//! Unified error handling for the sync application.

use std::fmt;

use thiserror::Error;

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source gateway unavailable after retries were exhausted
    #[error("Source unavailable for {context}: {message}")]
    SourceUnavailable { context: String, message: String },

    /// Store gateway rejected an operation
    #[error("Store error for {context}: {message}")]
    Store { context: String, message: String },

    /// Reconciliation invariant violated; aborts the affected group only
    #[error("Reconciliation invariant violated: {0}")]
    Invariant(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a source-unavailable error with context.
    pub fn source(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::SourceUnavailable {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a store error with context.
    pub fn store(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Store {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a reconciliation invariant error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }

    /// Whether retrying the same call may succeed.
    ///
    /// Timeouts, connection failures and 5xx responses are retryable;
    /// everything else (bad credentials, malformed payloads, 4xx) is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                e.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_http_errors_are_fatal() {
        assert!(!AppError::config("bad").is_retryable());
        assert!(!AppError::invariant("oops").is_retryable());
        assert!(!AppError::source("lessons", "exhausted").is_retryable());
    }
}
