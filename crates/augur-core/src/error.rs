//! Unified error types for Augur

use thiserror::Error;

/// Unified error type for all Augur operations
#[derive(Error, Debug)]
pub enum AugurError {
    // Game errors
    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Game already exists: {0}")]
    GameExists(String),

    // App errors
    #[error("App not found: {0}")]
    AppNotFound(String),

    #[error("App already exists: {0}")]
    AppExists(String),

    // Pattern errors
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    // History errors
    #[error("History too long: {len} results (maximum {max})")]
    HistoryTooLong { len: usize, max: usize },

    #[error("No results recorded for {0}")]
    HistoryNotFound(String),

    // Command errors
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using AugurError
pub type Result<T> = std::result::Result<T, AugurError>;
