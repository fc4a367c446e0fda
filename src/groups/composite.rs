//! Composite group source
//!
//! Asks several sources at once and merges their answers.

use crate::error::GroupSourceError;
use crate::groups::source::{BoxedGroupSource, Group, GroupSource};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Merges membership from several sources
///
/// A member that does not know the user contributes no groups. The user is
/// only unknown to the composite when every member reports it as unknown.
/// Group names are de-duplicated; the first occurrence wins.
pub struct CompositeGroupSource {
    sources: Vec<BoxedGroupSource>,
}

impl CompositeGroupSource {
    pub fn new(sources: Vec<BoxedGroupSource>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl GroupSource for CompositeGroupSource {
    async fn user_groups(&self, user: &str) -> Result<Vec<Group>, GroupSourceError> {
        let lookups = self.sources.iter().map(|source| async move {
            match source.user_groups(user).await {
                Ok(groups) => Ok(Some(groups)),
                Err(e) if e.is_unknown_user() => {
                    warn!(
                        user,
                        source = source.source_type(),
                        "User unknown to group source, skipping"
                    );
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        });

        let answers = try_join_all(lookups).await?;
        if answers.iter().all(Option::is_none) {
            return Err(GroupSourceError::UnknownUser(user.to_string()));
        }

        let mut seen = HashSet::new();
        let groups: Vec<Group> = answers
            .into_iter()
            .flatten()
            .flatten()
            .filter(|group| seen.insert(group.name.clone()))
            .collect();

        debug!(user, groups = groups.len(), "Merged group membership");
        Ok(groups)
    }

    fn source_type(&self) -> &'static str {
        "composite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::StaticGroupSource;

    struct FailingSource;

    #[async_trait]
    impl GroupSource for FailingSource {
        async fn user_groups(&self, _user: &str) -> Result<Vec<Group>, GroupSourceError> {
            Err(GroupSourceError::Failed("directory offline".into()))
        }

        fn source_type(&self) -> &'static str {
            "failing"
        }
    }

    fn composite() -> CompositeGroupSource {
        CompositeGroupSource::new(vec![
            Box::new(StaticGroupSource::from_names([("alice", vec!["staff", "admins"])])),
            Box::new(StaticGroupSource::from_names([
                ("alice", vec!["admins", "auditors"]),
                ("bob", vec!["staff"]),
            ])),
        ])
    }

    #[tokio::test]
    async fn test_merges_and_dedupes() {
        let groups = composite().user_groups("alice").await.unwrap();
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["staff", "admins", "auditors"]);
    }

    #[tokio::test]
    async fn test_user_known_to_one_source() {
        let groups = composite().user_groups("bob").await.unwrap();
        assert_eq!(groups, vec![Group::named("staff")]);
    }

    #[tokio::test]
    async fn test_user_unknown_everywhere() {
        let err = composite().user_groups("mallory").await.unwrap_err();
        assert!(err.is_unknown_user());
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let source = CompositeGroupSource::new(vec![
            Box::new(StaticGroupSource::from_names([("alice", vec!["staff"])])),
            Box::new(FailingSource),
        ]);
        let err = source.user_groups("alice").await.unwrap_err();
        assert!(matches!(err, GroupSourceError::Failed(_)));
    }
}
