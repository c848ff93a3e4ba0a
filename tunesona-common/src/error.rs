//! Common error types for Tunesona

use thiserror::Error;

/// Common result type for Tunesona operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Tunesona crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// No usable credential could be obtained
    #[error("Credential error: {0}")]
    Credential(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
