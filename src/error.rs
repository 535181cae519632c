//! Unified error hierarchy for Vitalis
//!
//! The insight and fatigue engines are total and never return errors. Everything
//! around them (configuration files, JSON inputs, target derivation) reports
//! failures through [`VitalisError`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all fallible Vitalis operations
#[derive(Debug, Error)]
pub enum VitalisError {
    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Caller-supplied input document errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration file and key errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be parsed as TOML
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {reason}")]
    Serialize { reason: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {key}")]
    UnknownKey { key: String },

    /// Value could not be parsed for the given key
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// Refusing to replace an existing configuration file
    #[error("Configuration file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Threshold table is internally inconsistent
    #[error("Invalid threshold {name}: {reason}")]
    InvalidThreshold { name: String, reason: String },
}

/// Errors in JSON documents handed to the CLI
#[derive(Debug, Error)]
pub enum InputError {
    /// Input file missing
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Document parsed but has the wrong shape
    #[error("Malformed {document} document: {reason}")]
    Malformed { document: String, reason: String },

    /// Timestamp argument could not be parsed
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp { value: String },
}

/// Result type alias for Vitalis operations
pub type Result<T> = std::result::Result<T, VitalisError>;

impl VitalisError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            VitalisError::Validation(_) => ErrorSeverity::Warning,
            VitalisError::Input(InputError::FileNotFound { .. }) => ErrorSeverity::Warning,
            VitalisError::Config(ConfigError::UnknownKey { .. })
            | VitalisError::Config(ConfigError::AlreadyExists { .. }) => ErrorSeverity::Warning,
            VitalisError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message suitable for printing to the terminal
    pub fn user_message(&self) -> String {
        match self {
            VitalisError::Input(InputError::FileNotFound { path }) => {
                format!("Could not find input file: {}", path.display())
            }
            VitalisError::Input(InputError::Malformed { document, .. }) => {
                format!("The {} file does not look right. Check its fields and try again.", document)
            }
            VitalisError::Config(ConfigError::UnknownKey { key }) => {
                format!("'{}' is not a configuration key. Run `vitalis config --list`.", key)
            }
            VitalisError::Config(ConfigError::AlreadyExists { path }) => {
                format!("{} already exists. Edit it with `vitalis config --set` or remove it first.", path.display())
            }
            VitalisError::Json(err) => format!("Could not read JSON input: {}", err),
            _ => self.to_string(),
        }
    }
}

/// How loudly an error should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bug or broken environment
    Critical,
    Error,
    /// Bad input the user can fix and retry
    Warning,
}

impl ErrorSeverity {
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
