//! Permission spec files
//!
//! Specs (and previously computed permission tables) are plain nested
//! mappings stored as JSON or TOML. The format is picked from the file
//! extension. Shape is not validated beyond what deserialization enforces;
//! CRUD fields missing from a record load as `false`.

use crate::access_control::{PermissionSpec, PermissionTable};
use crate::error::{SpecError, SpecResult};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// On-disk format of a spec or table file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Toml,
}

impl SpecFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(SpecFormat::Json),
            "toml" => Some(SpecFormat::Toml),
            _ => None,
        }
    }
}

/// Parse a permission spec from text
pub fn parse_spec(text: &str, format: SpecFormat) -> SpecResult<PermissionSpec> {
    parse(text, format)
}

/// Load a permission spec from a `.json` or `.toml` file
pub fn load_spec(path: impl AsRef<Path>) -> SpecResult<PermissionSpec> {
    let spec: PermissionSpec = load(path.as_ref())?;
    debug!(
        path = %path.as_ref().display(),
        resources = spec.len(),
        "Loaded permission spec"
    );
    Ok(spec)
}

/// Load a computed permission table from a `.json` or `.toml` file
pub fn load_table(path: impl AsRef<Path>) -> SpecResult<PermissionTable> {
    let table: PermissionTable = load(path.as_ref())?;
    debug!(
        path = %path.as_ref().display(),
        resources = table.len(),
        "Loaded permission table"
    );
    Ok(table)
}

fn load<T: DeserializeOwned>(path: &Path) -> SpecResult<T> {
    let format = SpecFormat::from_path(path).ok_or_else(|| SpecError::unsupported_format(path))?;
    let text = std::fs::read_to_string(path).map_err(|e| SpecError::read(path, e))?;
    parse(&text, format)
}

fn parse<T: DeserializeOwned>(text: &str, format: SpecFormat) -> SpecResult<T> {
    match format {
        SpecFormat::Json => Ok(serde_json::from_str(text)?),
        SpecFormat::Toml => Ok(toml::from_str(text)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access_control::CrudRecord;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SpecFormat::from_path(&PathBuf::from("perms.json")),
            Some(SpecFormat::Json)
        );
        assert_eq!(
            SpecFormat::from_path(&PathBuf::from("perms.TOML")),
            Some(SpecFormat::Toml)
        );
        assert_eq!(SpecFormat::from_path(&PathBuf::from("perms.yaml")), None);
        assert_eq!(SpecFormat::from_path(&PathBuf::from("perms")), None);
    }

    #[test]
    fn test_parse_toml_spec() {
        let text = r#"
[team.admins]
c = true
r = true
u = true
d = true

[team.staff]
r = true
"#;

        let spec = parse_spec(text, SpecFormat::Toml).unwrap();
        assert_eq!(spec.lookup("team", "admins"), Some(&CrudRecord::all()));
        assert_eq!(
            spec.lookup("team", "staff"),
            Some(&CrudRecord {
                read: true,
                ..CrudRecord::none()
            })
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_spec("{\"team\": ", SpecFormat::Json).unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
    }

    #[test]
    fn test_parse_wrong_shape() {
        let err = parse_spec(r#"{"team": {"admins": "all"}}"#, SpecFormat::Json).unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let err = load_spec("perms.yaml").unwrap_err();
        assert!(matches!(err, SpecError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_spec("/nonexistent/crud-perms/perms.json").unwrap_err();
        assert!(matches!(err, SpecError::Read { .. }));
    }
}
