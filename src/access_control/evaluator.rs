//! Permission evaluator
//!
//! Resolves a user's CRUD permissions from the groups they belong to:
//! 1. Resources not named in the spec fall back to the mode default
//! 2. Only groups the user belongs to are considered for a resource
//! 3. No relevant group also falls back to the mode default
//! 4. Whitelist: any relevant group granting the action is enough
//! 5. Blacklist: any relevant group revoking the action is enough

use crate::access_control::types::{Action, CrudRecord, ListMode, PermissionSpec, PermissionTable};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Permission evaluator bound to a spec and a mode
#[derive(Debug, Clone, Copy)]
pub struct PermissionEvaluator<'a> {
    spec: &'a PermissionSpec,
    mode: ListMode,
}

impl<'a> PermissionEvaluator<'a> {
    /// Create an evaluator using the default (whitelist) mode
    pub fn new(spec: &'a PermissionSpec) -> Self {
        Self::with_mode(spec, ListMode::default())
    }

    pub fn with_mode(spec: &'a PermissionSpec, mode: ListMode) -> Self {
        Self { spec, mode }
    }

    pub fn blacklist(spec: &'a PermissionSpec) -> Self {
        Self::with_mode(spec, ListMode::Blacklist)
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    /// Compute the permission table for every resource in the spec
    pub fn evaluate<S: AsRef<str>>(&self, groups: &[S]) -> PermissionTable {
        let membership = Membership::new(groups);

        debug!(
            resources = self.spec.len(),
            groups = groups.len(),
            mode = %self.mode,
            "Evaluating permissions"
        );

        self.spec
            .resources()
            .map(|resource| {
                let record =
                    CrudRecord::from_fn(|action| self.decide(resource, &membership, action));
                trace!(resource, ?record, "Resolved resource permissions");
                (resource.to_string(), record)
            })
            .collect()
    }

    /// Check a single action on a single resource
    pub fn has_permission<S: AsRef<str>>(
        &self,
        resource: &str,
        groups: &[S],
        action: Action,
    ) -> bool {
        let allowed = self.decide(resource, &Membership::new(groups), action);
        debug!(
            resource,
            action = %action,
            mode = %self.mode,
            allowed,
            "Checked permission"
        );
        allowed
    }

    fn decide(&self, resource: &str, membership: &Membership<'_>, action: Action) -> bool {
        let Some(rules) = self.spec.groups_for(resource) else {
            trace!(resource, "No rules for resource, using mode default");
            return self.mode.default_permission();
        };

        let mut relevant = rules
            .iter()
            .filter(|(group, _)| membership.contains(group))
            .map(|(_, record)| record.get(action))
            .peekable();

        if relevant.peek().is_none() {
            trace!(resource, "User is in no group named for resource");
            return self.mode.default_permission();
        }

        match self.mode {
            // One revoking group is enough to deny
            ListMode::Blacklist => relevant.all(|granted| granted),
            // One granting group is enough to allow
            ListMode::Whitelist => relevant.any(|granted| granted),
        }
    }
}

/// Set view over the caller's group list
struct Membership<'g> {
    groups: HashSet<&'g str>,
}

impl<'g> Membership<'g> {
    fn new<S: AsRef<str>>(groups: &'g [S]) -> Self {
        Self {
            groups: groups.iter().map(|group| group.as_ref()).collect(),
        }
    }

    fn contains(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

/// Compute the permission table for `groups` under `spec`
pub fn evaluate<S: AsRef<str>>(
    groups: &[S],
    spec: &PermissionSpec,
    mode: ListMode,
) -> PermissionTable {
    PermissionEvaluator::with_mode(spec, mode).evaluate(groups)
}

/// Check whether `groups` may perform `action` on `resource` under `spec`
pub fn has_permission<S: AsRef<str>>(
    resource: &str,
    groups: &[S],
    action: Action,
    spec: &PermissionSpec,
    mode: ListMode,
) -> bool {
    PermissionEvaluator::with_mode(spec, mode).has_permission(resource, groups, action)
}
