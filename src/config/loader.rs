//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (CRUD_PERMS__*)
//! 2. Configuration file (TOML)
//! 3. Default values
//!
//! Relative policy paths in a configuration file are resolved against the
//! directory containing that file.

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "crud-perms.toml",
    ".crud-perms.toml",
    "~/.config/crud-perms/config.toml",
    "/etc/crud-perms/config.toml",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Whether `level` names one of the tracing levels (case-insensitive)
pub fn is_log_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level.to_lowercase().as_str())
}

/// Load configuration from a TOML string (useful for testing)
///
/// Policy paths are kept exactly as written.
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Start with defaults (handled by serde defaults on AppConfig)

    // 2. Add configuration file
    let file_path = match config_path {
        Some(path) => {
            // Explicit path provided - must exist
            if !Path::new(path).exists() {
                return Err(ConfigError::Load(format!(
                    "Configuration file not found: {}",
                    path
                )));
            }
            Some(PathBuf::from(path))
        }
        // Try default paths (first existing one wins)
        None => DEFAULT_CONFIG_PATHS
            .iter()
            .map(|path| PathBuf::from(shellexpand::tilde(path).into_owned()))
            .find(|path| path.exists()),
    };

    if let Some(path) = &file_path {
        builder = builder.add_source(File::new(&path.to_string_lossy(), FileFormat::Toml));
    }

    // 3. Add environment variables with CRUD_PERMS prefix
    // e.g., CRUD_PERMS__LOGGING__LEVEL, CRUD_PERMS__LOGGING__FORMAT
    // Double underscore (__) maps to nested keys (logging.level)
    builder = builder.add_source(
        Environment::with_prefix("CRUD_PERMS")
            .separator("__")
            .try_parsing(true),
    );

    // Build and deserialize
    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let mut app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    if let Some(base) = file_path.as_deref().and_then(Path::parent) {
        resolve_policy_paths(&mut app_config, base);
    }

    validate_config(&app_config)?;
    app_config.file = file_path;

    Ok(app_config)
}

/// Make relative policy paths relative to `base`
fn resolve_policy_paths(config: &mut AppConfig, base: &Path) {
    for policy in &mut config.policies {
        if policy.path.is_relative() {
            policy.path = base.join(&policy.path);
        }
    }
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let mut names = HashSet::new();

    for (index, policy) in config.policies.iter().enumerate() {
        if policy.name.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: format!("policies[{}].name", index),
            });
        }

        if policy.path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: format!("policies[{}].path", index),
            });
        }

        if !names.insert(policy.name.as_str()) {
            return Err(ConfigError::Invalid {
                message: format!("duplicate policy name: {}", policy.name),
            });
        }
    }

    if !is_log_level(&config.logging.level) {
        return Err(ConfigError::Invalid {
            message: format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                config.logging.level
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::ListMode;
    use crate::config::types::{LogFormat, PolicyConfig};

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[logging]
level = "debug"
format = "json"

[[policies]]
name = "base"
path = "perms/base.json"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.policies.len(), 1);
        assert_eq!(config.policies[0].mode, ListMode::Whitelist);
    }

    #[test]
    fn test_load_config_from_str_with_directory() {
        let toml = r#"
[directory.users]
alice = ["admins", "staff"]
bob = []
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.directory.users.get("alice").unwrap(),
            &vec!["admins".to_string(), "staff".to_string()]
        );
        assert!(config.directory.users.get("bob").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_policy_name() {
        let toml = r#"
[[policies]]
name = "base"
path = "a.json"

[[policies]]
name = "base"
path = "b.json"
mode = "blacklist"
"#;

        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_empty_policy_name() {
        let config = AppConfig {
            policies: vec![PolicyConfig {
                name: " ".to_string(),
                path: PathBuf::from("a.json"),
                mode: ListMode::Whitelist,
            }],
            ..Default::default()
        };

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_is_log_level() {
        assert!(is_log_level("debug"));
        assert!(is_log_level("WARN"));
        assert!(!is_log_level("loud"));
        assert!(!is_log_level(""));
    }

    #[test]
    fn test_invalid_log_level() {
        let toml = r#"
[logging]
level = "loud"
"#;

        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_resolve_policy_paths() {
        let mut config = AppConfig {
            policies: vec![
                PolicyConfig {
                    name: "relative".to_string(),
                    path: PathBuf::from("perms/base.json"),
                    mode: ListMode::Whitelist,
                },
                PolicyConfig {
                    name: "absolute".to_string(),
                    path: PathBuf::from("/srv/perms/deny.json"),
                    mode: ListMode::Blacklist,
                },
            ],
            ..Default::default()
        };

        resolve_policy_paths(&mut config, Path::new("/etc/crud-perms"));
        assert_eq!(
            config.policies[0].path,
            PathBuf::from("/etc/crud-perms/perms/base.json")
        );
        assert_eq!(config.policies[1].path, PathBuf::from("/srv/perms/deny.json"));
    }
}
