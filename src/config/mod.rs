//! Configuration module
//!
//! Handles loading and validating configuration from TOML files and
//! environment variables, and reading permission spec files.

pub mod loader;
pub mod spec_loader;
pub mod types;

pub use loader::{is_log_level, load_config, load_config_from_str};
pub use spec_loader::{SpecFormat, load_spec, load_table, parse_spec};
pub use types::*;
