//! Combining and inverting permission tables
//!
//! Tables produced under known modes can be merged into one. The merged
//! table covers the union of both inputs' resources; each resource/action
//! pair is decided by a mode-specific rule where a resource missing from a
//! table means "no entry", which is not the same as an entry set to false.

use crate::access_control::types::{Action, CrudRecord, ListMode, ModedTable, PermissionTable};
use std::collections::BTreeSet;
use tracing::debug;

/// Negate every flag of every resource
pub fn invert(table: &PermissionTable) -> PermissionTable {
    table.inverted()
}

/// Merge two whitelist-derived tables; a grant in either wins
pub fn combine_whitelists(w1: &PermissionTable, w2: &PermissionTable) -> PermissionTable {
    merge(w1, w2, |first, second, action| {
        grants(first, action) || grants(second, action)
    })
}

/// Merge a whitelist-derived table with a blacklist-derived one
///
/// Resources the whitelist does not mention are denied outright. Otherwise a
/// revocation in the blacklist wins over the whitelist's grant.
pub fn combine_whitelist_and_blacklist(
    white: &PermissionTable,
    black: &PermissionTable,
) -> PermissionTable {
    merge(white, black, |white, black, action| {
        let Some(white) = white else {
            return false;
        };
        if revokes(black, action) {
            return false;
        }
        white.get(action)
    })
}

/// Merge two blacklist-derived tables; a revocation in either wins
pub fn combine_blacklists(b1: &PermissionTable, b2: &PermissionTable) -> PermissionTable {
    merge(b1, b2, |first, second, action| {
        if revokes(first, action) || revokes(second, action) {
            return false;
        }
        grants(first, action) || grants(second, action)
    })
}

/// Merge two tables whose modes are carried alongside them
///
/// | left | right | rule | result |
/// |------|-------|------|--------|
/// | whitelist | whitelist | [`combine_whitelists`] | whitelist |
/// | whitelist | blacklist | [`combine_whitelist_and_blacklist`] | whitelist |
/// | blacklist | whitelist | [`combine_whitelist_and_blacklist`] (swapped) | whitelist |
/// | blacklist | blacklist | [`combine_blacklists`] | blacklist |
pub fn combine(left: &ModedTable, right: &ModedTable) -> ModedTable {
    debug!(left = %left.mode, right = %right.mode, "Combining permission tables");

    match (left.mode, right.mode) {
        (ListMode::Whitelist, ListMode::Whitelist) => {
            ModedTable::whitelist(combine_whitelists(&left.table, &right.table))
        }
        (ListMode::Whitelist, ListMode::Blacklist) => {
            ModedTable::whitelist(combine_whitelist_and_blacklist(&left.table, &right.table))
        }
        (ListMode::Blacklist, ListMode::Whitelist) => {
            ModedTable::whitelist(combine_whitelist_and_blacklist(&right.table, &left.table))
        }
        (ListMode::Blacklist, ListMode::Blacklist) => {
            ModedTable::blacklist(combine_blacklists(&left.table, &right.table))
        }
    }
}

fn grants(record: Option<&CrudRecord>, action: Action) -> bool {
    record.is_some_and(|r| r.get(action))
}

fn revokes(record: Option<&CrudRecord>, action: Action) -> bool {
    record.is_some_and(|r| !r.get(action))
}

/// Decide every action of every resource present in either table
fn merge<F>(first: &PermissionTable, second: &PermissionTable, decide: F) -> PermissionTable
where
    F: Fn(Option<&CrudRecord>, Option<&CrudRecord>, Action) -> bool,
{
    let resources: BTreeSet<&str> = first.resources().chain(second.resources()).collect();

    resources
        .into_iter()
        .map(|resource| {
            let a = first.get(resource);
            let b = second.get(resource);
            let record = CrudRecord::from_fn(|action| decide(a, b, action));
            (resource.to_string(), record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(action: Action) -> CrudRecord {
        CrudRecord::from_fn(|a| a == action)
    }

    #[test]
    fn test_invert_keeps_keys() {
        let table = PermissionTable::new()
            .with("team", only(Action::Read))
            .with("role", CrudRecord::none());
        let inverted = invert(&table);
        assert_eq!(inverted.len(), 2);
        assert_eq!(inverted.get("role"), Some(&CrudRecord::all()));
        assert!(!inverted.allows("team", Action::Read));
        assert!(inverted.allows("team", Action::Delete));
    }

    #[test]
    fn test_whitelists_one_side_only() {
        let w1 = PermissionTable::new().with("team", only(Action::Update));
        let w2 = PermissionTable::new();
        let merged = combine_whitelists(&w1, &w2);
        assert_eq!(merged.get("team"), Some(&only(Action::Update)));
    }

    #[test]
    fn test_whitelists_both_false() {
        let w1 = PermissionTable::new().with("team", CrudRecord::none());
        let w2 = PermissionTable::new().with("team", CrudRecord::none());
        assert_eq!(
            combine_whitelists(&w1, &w2).get("team"),
            Some(&CrudRecord::none())
        );
    }

    #[test]
    fn test_white_and_black_without_white_entry() {
        let white = PermissionTable::new();
        let black = PermissionTable::new().with("team", CrudRecord::all());
        let merged = combine_whitelist_and_blacklist(&white, &black);
        assert_eq!(merged.get("team"), Some(&CrudRecord::none()));
    }

    #[test]
    fn test_white_and_black_revocation_wins() {
        let white = PermissionTable::new().with("team", CrudRecord::all());
        let black = PermissionTable::new().with("team", !only(Action::Delete));
        let merged = combine_whitelist_and_blacklist(&white, &black);
        assert_eq!(merged.get("team"), Some(&!only(Action::Delete)));
    }

    #[test]
    fn test_white_and_black_without_black_entry() {
        let white = PermissionTable::new().with("team", only(Action::Read));
        let merged = combine_whitelist_and_blacklist(&white, &PermissionTable::new());
        assert_eq!(merged.get("team"), Some(&only(Action::Read)));
    }

    #[test]
    fn test_blacklists_revocation_wins() {
        let b1 = PermissionTable::new().with("team", CrudRecord::all());
        let b2 = PermissionTable::new().with("team", !only(Action::Create));
        let merged = combine_blacklists(&b1, &b2);
        assert!(!merged.allows("team", Action::Create));
        assert!(merged.allows("team", Action::Read));
    }

    #[test]
    fn test_combine_dispatch_swaps_black_white() {
        let white = ModedTable::whitelist(PermissionTable::new().with("team", CrudRecord::all()));
        let black = ModedTable::blacklist(PermissionTable::new().with("team", only(Action::Read)));

        let forward = combine(&white, &black);
        let backward = combine(&black, &white);

        assert_eq!(forward, backward);
        assert_eq!(forward.mode, ListMode::Whitelist);
        assert_eq!(forward.table.get("team"), Some(&only(Action::Read)));
    }

    #[test]
    fn test_combine_dispatch_result_modes() {
        let white = ModedTable::whitelist(PermissionTable::new());
        let black = ModedTable::blacklist(PermissionTable::new());
        assert_eq!(combine(&white, &white).mode, ListMode::Whitelist);
        assert_eq!(combine(&black, &black).mode, ListMode::Blacklist);
    }
}
