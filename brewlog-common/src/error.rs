//! Common error types for brewlog

use thiserror::Error;

/// Common result type for brewlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the brewlog crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Caller is not allowed to access the resource
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Attempt to create a resource that already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
