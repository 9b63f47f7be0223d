//! Rule matching predicates.

use crate::path;
use crate::rules::types::RuleKind;
use regex::Regex;

/// Prefix selecting regex syntax in a pattern rule.
const REGEX_PREFIX: &str = "{regex}";

/// Tests a pattern rule against a folder's base name.
///
/// Syntax, case-sensitive:
/// - `{regex}<expr>` — regex test; an invalid expression matches nothing
/// - `*text*` — contains
/// - `*text` — ends with
/// - `text*` — starts with
/// - `text` — exact match
///
/// Empty and whitespace-only patterns never match.
pub fn matches_pattern(pattern: &str, folder_name: &str) -> bool {
    if pattern.trim().is_empty() {
        return false;
    }

    if let Some(expr) = pattern.strip_prefix(REGEX_PREFIX) {
        // Invalid regex is a dead rule, not an error.
        return match Regex::new(expr) {
            Ok(re) => re.is_match(folder_name),
            Err(_) => false,
        };
    }

    if let Some(inner) = pattern
        .strip_prefix('*')
        .and_then(|p| p.strip_suffix('*'))
    {
        return folder_name.contains(inner);
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return folder_name.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return folder_name.starts_with(prefix);
    }

    folder_name == pattern
}

/// Tests an exact-path rule against a folder path: equality, or subtree
/// containment when the rule includes subfolders.
pub fn matches_path(rule_path: &str, include_subfolders: bool, folder_path: &str) -> bool {
    if rule_path == folder_path {
        return true;
    }
    include_subfolders && path::is_self_or_descendant(folder_path, rule_path)
}

/// Tests any rule selector against a folder path.
///
/// Pattern rules look only at the folder's base name; path rules at the
/// whole path.
pub fn matches(kind: &RuleKind, folder_path: &str) -> bool {
    match kind {
        RuleKind::Path {
            path,
            include_subfolders,
            ..
        } => matches_path(path, *include_subfolders, folder_path),
        RuleKind::Pattern { pattern } => matches_pattern(pattern, path::base_name(folder_path)),
    }
}
