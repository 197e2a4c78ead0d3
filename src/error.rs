//! Error types for joinwise
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors with clear error chains.
//!
//! Note that none of these ever reach the completion path: provider
//! failures stop at the refresh boundary and become notifications.

use std::io;

/// Main error type for joinwise
#[derive(Debug, thiserror::Error)]
pub enum JoinwiseError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Host protocol errors
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Database operation errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Not connected to a database
    #[error("No active connection")]
    NotConnected,
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Config file could not be read
    #[error("Configuration file not readable: {0}")]
    NotFound(String),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Connection profile not found
    #[error("Connection profile '{0}' not found")]
    ProfileNotFound(String),
}

/// Command parsing errors
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Unknown command
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// Empty input
    #[error("Empty command")]
    Empty,
}

/// Host protocol (newline-delimited JSON) errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Request line was not valid JSON or had an unknown shape
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Specialized Result type for joinwise operations
pub type Result<T> = std::result::Result<T, JoinwiseError>;

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized Result type for command operations
pub type CommandResult<T> = std::result::Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_wraps_into_top_level() {
        let err: JoinwiseError = DbError::NotConnected.into();
        assert_eq!(err.to_string(), "Database error: No active connection");
    }

    #[test]
    fn test_protocol_error_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let err: ProtocolError = parse.unwrap_err().into();
        assert!(err.to_string().starts_with("Malformed request:"));
    }
}
