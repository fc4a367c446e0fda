//! Permission types
//!
//! Core types shared by the evaluator and the combiner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Not;

/// One of the four CRUD actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "c", alias = "create")]
    Create,
    #[serde(rename = "r", alias = "read")]
    Read,
    #[serde(rename = "u", alias = "update")]
    Update,
    #[serde(rename = "d", alias = "delete")]
    Delete,
}

impl Action {
    /// Short key used in permission specs (`c`, `r`, `u`, `d`)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "c",
            Action::Read => "r",
            Action::Update => "u",
            Action::Delete => "d",
        }
    }

    /// Full lowercase name of the action
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Parse either the short key or the full name
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "c" | "create" => Some(Action::Create),
            "r" | "read" => Some(Action::Read),
            "u" | "update" => Some(Action::Update),
            "d" | "delete" => Some(Action::Delete),
            _ => None,
        }
    }

    /// All actions, in CRUD order
    pub fn all() -> &'static [Action] {
        &[Action::Create, Action::Read, Action::Update, Action::Delete]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Interpretation of a permission spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// Entries grant; no matching entry means no access
    #[default]
    Whitelist,
    /// Entries revoke; no matching entry means full access
    Blacklist,
}

impl ListMode {
    pub const fn is_blacklist(&self) -> bool {
        matches!(self, ListMode::Blacklist)
    }

    /// Permission assumed when no rule applies
    pub const fn default_permission(&self) -> bool {
        self.is_blacklist()
    }

    pub const fn from_blacklist_flag(is_blacklist: bool) -> Self {
        if is_blacklist {
            ListMode::Blacklist
        } else {
            ListMode::Whitelist
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ListMode::Whitelist => "whitelist",
            ListMode::Blacklist => "blacklist",
        }
    }

    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "whitelist" | "white" => Some(ListMode::Whitelist),
            "blacklist" | "black" => Some(ListMode::Blacklist),
            _ => None,
        }
    }
}

impl fmt::Display for ListMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Create/read/update/delete flags for one resource
///
/// Missing fields deserialize to `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudRecord {
    #[serde(rename = "c")]
    pub create: bool,
    #[serde(rename = "r")]
    pub read: bool,
    #[serde(rename = "u")]
    pub update: bool,
    #[serde(rename = "d")]
    pub delete: bool,
}

impl CrudRecord {
    /// Record with every action set to `value`
    pub const fn uniform(value: bool) -> Self {
        Self {
            create: value,
            read: value,
            update: value,
            delete: value,
        }
    }

    pub const fn none() -> Self {
        Self::uniform(false)
    }

    pub const fn all() -> Self {
        Self::uniform(true)
    }

    /// Build a record by asking `f` for each action
    pub fn from_fn(mut f: impl FnMut(Action) -> bool) -> Self {
        Self {
            create: f(Action::Create),
            read: f(Action::Read),
            update: f(Action::Update),
            delete: f(Action::Delete),
        }
    }

    pub const fn get(&self, action: Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// Actions this record grants
    pub fn granted(&self) -> impl Iterator<Item = Action> {
        let record = *self;
        Action::all().iter().copied().filter(move |a| record.get(*a))
    }
}

impl Not for CrudRecord {
    type Output = CrudRecord;

    fn not(self) -> Self::Output {
        CrudRecord::from_fn(|action| !self.get(action))
    }
}

/// Declarative permission rules: resource -> group -> CRUD record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSpec {
    resources: BTreeMap<String, BTreeMap<String, CrudRecord>>,
}

impl PermissionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record for a group on a resource, replacing any previous one
    pub fn insert(
        &mut self,
        resource: impl Into<String>,
        group: impl Into<String>,
        record: CrudRecord,
    ) -> &mut Self {
        self.resources
            .entry(resource.into())
            .or_default()
            .insert(group.into(), record);
        self
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(
        mut self,
        resource: impl Into<String>,
        group: impl Into<String>,
        record: CrudRecord,
    ) -> Self {
        self.insert(resource, group, record);
        self
    }

    /// Group rules for a resource, if the resource is specified at all
    pub fn groups_for(&self, resource: &str) -> Option<&BTreeMap<String, CrudRecord>> {
        self.resources.get(resource)
    }

    /// Two-level lookup of a group's record on a resource
    pub fn lookup(&self, resource: &str, group: &str) -> Option<&CrudRecord> {
        self.resources.get(resource)?.get(group)
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl From<BTreeMap<String, BTreeMap<String, CrudRecord>>> for PermissionSpec {
    fn from(resources: BTreeMap<String, BTreeMap<String, CrudRecord>>) -> Self {
        Self { resources }
    }
}

/// Resolved permissions: resource -> CRUD record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable {
    entries: BTreeMap<String, CrudRecord>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        resource: impl Into<String>,
        record: CrudRecord,
    ) -> Option<CrudRecord> {
        self.entries.insert(resource.into(), record)
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(mut self, resource: impl Into<String>, record: CrudRecord) -> Self {
        self.entries.insert(resource.into(), record);
        self
    }

    pub fn get(&self, resource: &str) -> Option<&CrudRecord> {
        self.entries.get(resource)
    }

    /// Whether `action` is granted on `resource`; absent resources grant nothing
    pub fn allows(&self, resource: &str, action: Action) -> bool {
        self.get(resource).is_some_and(|record| record.get(action))
    }

    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CrudRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// New table with every flag negated
    pub fn inverted(&self) -> Self {
        self.entries
            .iter()
            .map(|(resource, record)| (resource.clone(), !*record))
            .collect()
    }
}

impl FromIterator<(String, CrudRecord)> for PermissionTable {
    fn from_iter<I: IntoIterator<Item = (String, CrudRecord)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PermissionTable {
    type Item = (&'a String, &'a CrudRecord);
    type IntoIter = std::collections::btree_map::Iter<'a, String, CrudRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A permission table paired with the mode it was produced under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModedTable {
    pub mode: ListMode,
    pub table: PermissionTable,
}

impl ModedTable {
    pub fn new(mode: ListMode, table: PermissionTable) -> Self {
        Self { mode, table }
    }

    pub fn whitelist(table: PermissionTable) -> Self {
        Self::new(ListMode::Whitelist, table)
    }

    pub fn blacklist(table: PermissionTable) -> Self {
        Self::new(ListMode::Blacklist, table)
    }
}
