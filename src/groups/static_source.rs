//! Static group source
//!
//! Membership declared up front, typically in the `[directory.users]`
//! section of the configuration file.

use crate::error::GroupSourceError;
use crate::groups::source::{Group, GroupSource};
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory user to groups mapping
#[derive(Debug, Clone, Default)]
pub struct StaticGroupSource {
    users: HashMap<String, Vec<Group>>,
}

impl StaticGroupSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a user -> group names mapping
    pub fn from_names<I, U, G>(users: I) -> Self
    where
        I: IntoIterator<Item = (U, Vec<G>)>,
        U: Into<String>,
        G: Into<String>,
    {
        let users = users
            .into_iter()
            .map(|(user, groups)| {
                (
                    user.into(),
                    groups.into_iter().map(Group::named).collect(),
                )
            })
            .collect();
        Self { users }
    }

    /// Add a user, replacing any previous membership
    pub fn with_user(mut self, user: impl Into<String>, groups: Vec<Group>) -> Self {
        self.users.insert(user.into(), groups);
        self
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl GroupSource for StaticGroupSource {
    async fn user_groups(&self, user: &str) -> Result<Vec<Group>, GroupSourceError> {
        self.users
            .get(user)
            .cloned()
            .ok_or_else(|| GroupSourceError::UnknownUser(user.to_string()))
    }

    fn source_type(&self) -> &'static str {
        "static directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_user() {
        let source = StaticGroupSource::from_names([("alice", vec!["admins", "staff"])]);
        let groups = source.user_groups("alice").await.unwrap();
        assert_eq!(groups, vec![Group::named("admins"), Group::named("staff")]);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let source = StaticGroupSource::new();
        let err = source.user_groups("mallory").await.unwrap_err();
        assert!(err.is_unknown_user());
    }

    #[tokio::test]
    async fn test_user_without_groups() {
        let source = StaticGroupSource::new().with_user("bob", vec![]);
        assert!(source.user_groups("bob").await.unwrap().is_empty());
        assert_eq!(source.user_count(), 1);
    }
}
