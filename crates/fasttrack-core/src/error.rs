//! Core error types for fasttrack-core.
//!
//! This module defines the error hierarchy using thiserror. Storage errors
//! are advisory -- the timer engine logs and swallows them -- while save
//! errors surface to the caller so the UI can distinguish a timeout from a
//! generic failure.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fasttrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fast-log save errors
    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Key-value storage errors.
///
/// The engine treats all of these as best-effort failures: logged, never
/// propagated, never blocking a state transition.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read key '{key}': {message}")]
    Read { key: String, message: String },

    #[error("Failed to write key '{key}': {message}")]
    Write { key: String, message: String },

    #[error("Failed to remove key '{key}': {message}")]
    Remove { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Failure taxonomy for logging a completed fast to the backend.
///
/// All three variants leave the pending review record intact; only a
/// successful save or an explicit discard clears it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SaveError {
    /// Transport-level failure (DNS, refused connection, dropped socket).
    #[error("Network error: {message}")]
    Network { message: String },

    /// The bounded request deadline elapsed before a response arrived.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The server answered with a non-2xx status.
    #[error("Server rejected fast log (HTTP {status})")]
    Server { status: u16 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
