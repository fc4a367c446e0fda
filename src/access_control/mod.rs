//! Access control module
//!
//! Computes per-resource CRUD permissions from group membership.
//!
//! ## Permission Model
//!
//! A [`PermissionSpec`] maps each resource to the groups that have rules for
//! it, and each group to a CRUD record. The same spec can be read two ways:
//!
//! - **Whitelist** - records grant. A user gets an action if *any* of their
//!   groups grants it. No applicable rule means no access.
//! - **Blacklist** - records revoke. A user loses an action if *any* of their
//!   groups revokes it. No applicable rule means full access.
//!
//! Evaluation yields a [`PermissionTable`]. Tables do not remember their mode;
//! wrap them in a [`ModedTable`] to have [`combine`] pick the right merge rule:
//!
//! - whitelist + whitelist: a grant in either wins
//! - whitelist + blacklist: a revocation wins; resources unknown to the
//!   whitelist are denied
//! - blacklist + blacklist: a revocation in either wins
//!
//! ## Example Spec
//!
//! ```json
//! {
//!   "team": {
//!     "admins": {"c": true, "r": true, "u": true, "d": true},
//!     "staff":  {"c": false, "r": true, "u": true, "d": false}
//!   }
//! }
//! ```

pub mod combiner;
pub mod evaluator;
pub mod types;

pub use combiner::{
    combine, combine_blacklists, combine_whitelist_and_blacklist, combine_whitelists, invert,
};
pub use evaluator::{PermissionEvaluator, evaluate, has_permission};
pub use types::{Action, CrudRecord, ListMode, ModedTable, PermissionSpec, PermissionTable};
