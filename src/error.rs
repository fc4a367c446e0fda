//! Error types for crud-perms
//!
//! Permission evaluation itself never fails. Errors only come from the layers
//! around it: configuration, loading spec files, and resolving group
//! membership. We use `thiserror` for these and let the binary wrap them in
//! `anyhow` at the boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Permission spec error: {0}")]
    Spec(#[from] SpecError),

    #[error("Group lookup error: {0}")]
    GroupSource(#[from] GroupSourceError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// Errors reading a permission spec or permission table from disk
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported file format for '{}' (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl SpecError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }
}

/// Group membership lookup errors
#[derive(Error, Debug)]
pub enum GroupSourceError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Group lookup failed: {0}")]
    Failed(String),
}

impl GroupSourceError {
    pub fn is_unknown_user(&self) -> bool {
        matches!(self, GroupSourceError::UnknownUser(_))
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for spec loading
pub type SpecResult<T> = std::result::Result<T, SpecError>;
