//! Configuration types for crud-perms
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::access_control::ListMode;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Permission policies, folded together in order
    pub policies: Vec<PolicyConfig>,

    /// Statically declared group membership
    pub directory: DirectoryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// File this configuration was read from, if any
    #[serde(skip)]
    pub file: Option<PathBuf>,
}

/// A named permission spec file and the mode it is read in
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyConfig {
    /// Name used in logs and error messages
    pub name: String,

    /// Path to a `.json` or `.toml` permission spec
    pub path: PathBuf,

    /// Whitelist (default) or blacklist
    #[serde(default)]
    pub mode: ListMode,
}

/// Static group directory
///
/// ```toml
/// [directory.users]
/// alice = ["admins", "staff"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// User name -> group names
    pub users: HashMap<String, Vec<String>>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.policies.is_empty());
        assert!(config.directory.users.is_empty());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_deserialize_list_mode() {
        let mode: ListMode = serde_json::from_str(r#""blacklist""#).unwrap();
        assert_eq!(mode, ListMode::Blacklist);

        let mode: ListMode = serde_json::from_str(r#""whitelist""#).unwrap();
        assert_eq!(mode, ListMode::Whitelist);
    }

    #[test]
    fn test_policy_mode_defaults_to_whitelist() {
        let policy: PolicyConfig =
            serde_json::from_str(r#"{"name": "base", "path": "perms/base.json"}"#).unwrap();
        assert_eq!(policy.mode, ListMode::Whitelist);
        assert_eq!(policy.path, PathBuf::from("perms/base.json"));
    }

    #[test]
    fn test_deserialize_log_format() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
    }
}
