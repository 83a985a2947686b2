//! Custom error types for the session service

use thiserror::Error;

/// Reason a persisted session was rejected during rehydration
#[derive(Error, Debug)]
pub enum CorruptSession {
    /// The stored value is not valid JSON or does not match the session shape
    #[error("malformed session: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The stored session names a role outside patient, doctor and admin
    #[error("invalid role in stored session: {0:?}")]
    InvalidRole(String),
}

/// Error loading the service configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error raised by the configuration loader
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// Error preparing the configured store
    #[error("Store error: {0}")]
    Store(#[from] common::StoreError),
}
