//! Error types for the site widget facade
//!
//! This module defines error types using thiserror. Absent settings keys and
//! absent dictionary keys are not errors; they resolve to documented defaults.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for facade operations
#[derive(Error, Debug)]
pub enum FacadeError {
    /// Asset or structured file does not exist
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Structured file could not be parsed
    #[error("Failed to parse structured file {path}: {message}")]
    Data {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Widget type has no package
    #[error("Widget '{0}' is not mapped to a widget package")]
    MisconfiguredWidget(String),

    /// Site configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Other I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FacadeError {
    /// Build a not-found error for a path
    pub fn not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::ResourceNotFound(path.as_ref().display().to_string())
    }

    /// Whether this error means the requested file or asset does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound(_))
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Config file is not valid TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Config could not be written back
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// No platform config directory
    #[error("Config directory not found")]
    NoConfigDir,

    /// A field holds an unusable value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result of facade operations
pub type Result<T> = std::result::Result<T, FacadeError>;
/// Result of configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
