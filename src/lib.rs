//! Group-based CRUD permissions
//!
//! Computes per-resource Create/Read/Update/Delete permissions for a user
//! from the groups they belong to and a declarative permission spec.
//!
//! ## Features
//!
//! - **Whitelist and blacklist specs** - the same spec format read as grants
//!   or as revocations
//! - **Combination rules** for whitelist+whitelist, whitelist+blacklist and
//!   blacklist+blacklist results
//! - **Policies** - several named specs evaluated and folded for one user
//! - **Pluggable group sources** - async lookup of a user's groups
//!
//! ## Example
//!
//! ```
//! use crud_perms::access_control::{Action, CrudRecord, ListMode, PermissionSpec, evaluate};
//!
//! let spec = PermissionSpec::new().with(
//!     "team",
//!     "editors",
//!     CrudRecord { read: true, update: true, ..CrudRecord::none() },
//! );
//!
//! let table = evaluate(&["editors"], &spec, ListMode::Whitelist);
//! assert!(table.allows("team", Action::Update));
//! assert!(!table.allows("team", Action::Delete));
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [logging]
//! level = "info"
//!
//! [[policies]]
//! name = "base"
//! path = "perms/base.json"
//! mode = "whitelist"
//!
//! [[policies]]
//! name = "freeze"
//! path = "perms/freeze.toml"
//! mode = "blacklist"
//!
//! [directory.users]
//! alice = ["admins", "staff"]
//! ```

pub mod access_control;
pub mod cli;
pub mod config;
pub mod error;
pub mod groups;
pub mod policy;

// Re-export main types
pub use access_control::{
    Action, CrudRecord, ListMode, ModedTable, PermissionEvaluator, PermissionSpec, PermissionTable,
};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use policy::{Policy, PolicySet};
