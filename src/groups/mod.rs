//! Group membership module
//!
//! Resolves which groups a user belongs to before permissions are evaluated.
//! Permission evaluation only ever sees the flattened group names.

pub mod composite;
pub mod source;
pub mod static_source;

pub use composite::CompositeGroupSource;
pub use source::{BoxedGroupSource, Group, GroupSource, group_names};
pub use static_source::StaticGroupSource;

use crate::config::DirectoryConfig;

/// Create a group source from configuration
pub fn create_group_source(config: &DirectoryConfig) -> BoxedGroupSource {
    Box::new(StaticGroupSource::from_names(config.users.clone()))
}
