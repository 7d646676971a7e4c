//! Error types for dbadmin

use thiserror::Error;

/// Core error type for database interaction
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, AdminError>;
