//! Core error types for dailydose-core.
//!
//! This module defines the error hierarchy using thiserror. Storage and
//! configuration failures and rejected decisions each get their own enum and
//! fold into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

use crate::day::{DayId, DayStatus};

/// Core error type for dailydose-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A decision was rejected
    #[error("Invalid operation: {0}")]
    Decision(#[from] DecisionError),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The tracker snapshot could not be encoded
    #[error("Failed to serialize tracker state: {0}")]
    Serialize(String),

    /// The backing store refused the write
    #[error("Write rejected for key '{key}': {message}")]
    WriteRejected { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Reasons a decision is refused without touching the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    /// Only a `Pending` day accepts a decision.
    #[error("{id} is {status}, only a pending day can be decided")]
    NotPending { id: DayId, status: DayStatus },

    /// The id is outside the tracked range.
    #[error("{0} is not part of the tracked range")]
    UnknownDay(DayId),

    /// Nothing is unlocked today.
    #[error("no day is pending a decision")]
    NothingPending,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseBusy
                    || err.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
