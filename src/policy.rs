//! Named permission policies
//!
//! A deployment usually has more than one spec: a base whitelist, a
//! blacklist of revocations, a whitelist for a department. A [`PolicySet`]
//! evaluates each of them for the same groups and folds the tables together,
//! left to right, with the merge rule matching each pair of modes.

use crate::access_control::{ListMode, ModedTable, PermissionEvaluator, PermissionSpec, combine};
use crate::config::{PolicyConfig, load_spec};
use crate::error::{GroupSourceError, SpecError};
use crate::groups::{GroupSource, group_names};
use tracing::{debug, info};

/// A permission spec with a name and the mode it is read in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub name: String,
    pub mode: ListMode,
    pub spec: PermissionSpec,
}

impl Policy {
    pub fn new(name: impl Into<String>, mode: ListMode, spec: PermissionSpec) -> Self {
        Self {
            name: name.into(),
            mode,
            spec,
        }
    }

    /// Evaluate this policy for `groups`
    pub fn evaluate<S: AsRef<str>>(&self, groups: &[S]) -> ModedTable {
        let table = PermissionEvaluator::with_mode(&self.spec, self.mode).evaluate(groups);
        ModedTable::new(self.mode, table)
    }
}

/// Ordered collection of policies
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    policies: Vec<Policy>,
}

impl PolicySet {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    /// Load every configured policy's spec file
    pub fn load(configs: &[PolicyConfig]) -> Result<Self, SpecError> {
        let policies = configs
            .iter()
            .map(|config| {
                let spec = load_spec(&config.path)?;
                info!(
                    policy = %config.name,
                    mode = %config.mode,
                    resources = spec.len(),
                    "Loaded policy"
                );
                Ok(Policy::new(config.name.clone(), config.mode, spec))
            })
            .collect::<Result<Vec<_>, SpecError>>()?;

        Ok(Self { policies })
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Evaluate every policy and fold the results
    ///
    /// Returns `None` when the set has no policies.
    pub fn evaluate_groups<S: AsRef<str>>(&self, groups: &[S]) -> Option<ModedTable> {
        self.policies
            .iter()
            .map(|policy| {
                debug!(policy = %policy.name, "Evaluating policy");
                policy.evaluate(groups)
            })
            .reduce(|acc, next| combine(&acc, &next))
    }

    /// Resolve `user`'s groups through `source`, then evaluate
    pub async fn evaluate_user(
        &self,
        source: &dyn GroupSource,
        user: &str,
    ) -> Result<Option<ModedTable>, GroupSourceError> {
        let groups = source.user_groups(user).await?;
        let names = group_names(&groups);

        debug!(
            user,
            source = source.source_type(),
            groups = ?names,
            "Resolved user groups"
        );

        Ok(self.evaluate_groups(&names))
    }
}
