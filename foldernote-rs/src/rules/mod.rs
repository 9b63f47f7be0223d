//! Exclusion and whitelist rules: records, matching, ordered storage, and
//! effective-flag resolution.

pub mod matcher;
pub mod resolve;
pub mod store;
pub mod types;

pub use resolve::{resolve, resolve_ignoring_whitelist};
pub use store::RuleList;
pub use types::{EffectiveFlags, FlagBundle, MergeFlags, Rule, RuleKind, WhitelistBundle};
