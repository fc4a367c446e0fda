//! Group source trait
//!
//! Group membership lives outside this crate (an identity provider, a
//! directory, a config file). A source answers one question: which groups
//! does this user belong to.

use crate::error::GroupSourceError;
// async_trait required for dyn-compatibility with Box<dyn GroupSource>
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A group a user belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    /// Name used as the group identifier in permission specs
    pub name: String,
    /// Source-specific identifier (e.g. a directory URL)
    pub id: String,
}

impl Group {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    /// Group whose id is its name
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
        }
    }
}

/// Group membership source
///
/// Implementations resolve the groups of a user handle. The returned order
/// carries no meaning for permission evaluation.
#[async_trait]
pub trait GroupSource: Send + Sync {
    /// Get the groups `user` belongs to
    ///
    /// Returns [`GroupSourceError::UnknownUser`] when the source has no
    /// record of the user at all.
    async fn user_groups(&self, user: &str) -> Result<Vec<Group>, GroupSourceError>;

    /// Get a description of the source (for logging)
    fn source_type(&self) -> &'static str;
}

/// Box type alias for group sources
pub type BoxedGroupSource = Box<dyn GroupSource>;

/// Flatten group records into the names permission specs refer to
pub fn group_names(groups: &[Group]) -> Vec<String> {
    groups.iter().map(|g| g.name.clone()).collect()
}
