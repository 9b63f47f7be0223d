//! Effective-flag resolution for a folder path.
//!
//! Walks the exclusion rules, folds every match into one bundle, then lets
//! whitelist matches override by negation. Safe to call per rendered tree
//! node: read-only and allocation-light.

use crate::rules::matcher;
use crate::rules::store::RuleList;
use crate::rules::types::{EffectiveFlags, FlagBundle, MergeFlags, Rule, WhitelistBundle};
use crate::settings::Settings;

/// Resolves the effective behavior flags for a folder.
///
/// Returns `None` when no rule matches at all. A rule that matches but
/// asserts nothing yields `Some` with every flag false — callers that care
/// about "was anything excluded" must look at the flags, not at `Some`.
///
/// `include_detached` also considers rules marking broken bindings;
/// `path_only` skips pattern rules entirely.
pub fn resolve(
    settings: &Settings,
    folder_path: &str,
    include_detached: bool,
    path_only: bool,
) -> Option<EffectiveFlags> {
    resolve_inner(settings, folder_path, include_detached, path_only, false)
}

/// Like [`resolve`], but without applying whitelist overrides.
pub fn resolve_ignoring_whitelist(
    settings: &Settings,
    folder_path: &str,
    include_detached: bool,
    path_only: bool,
) -> Option<EffectiveFlags> {
    resolve_inner(settings, folder_path, include_detached, path_only, true)
}

fn resolve_inner(
    settings: &Settings,
    folder_path: &str,
    include_detached: bool,
    path_only: bool,
    ignore_whitelist: bool,
) -> Option<EffectiveFlags> {
    let matched = matched_rules(
        &settings.excluded_folders,
        folder_path,
        include_detached,
        path_only,
    );
    if matched.is_empty() {
        return None;
    }

    let detached = matched.iter().any(|r| r.kind.detached());
    let mut bundle = aggregate(&matched);

    if !ignore_whitelist && !detached {
        let whitelisted = matched_rules(
            &settings.whitelist_folders,
            folder_path,
            include_detached,
            path_only,
        );
        if !whitelisted.is_empty() {
            apply_whitelist(&mut bundle, &aggregate(&whitelisted));
        }
    }

    Some(EffectiveFlags::from_bundle(&bundle, detached))
}

/// All rules matching a folder: pattern matches first, then path matches,
/// minus detached rules unless requested.
fn matched_rules<'a, F>(
    rules: &'a RuleList<F>,
    folder_path: &str,
    include_detached: bool,
    path_only: bool,
) -> Vec<&'a Rule<F>> {
    let mut matched: Vec<&Rule<F>> = Vec::new();

    if !path_only {
        matched.extend(
            rules
                .iter()
                .filter(|r| r.kind.is_pattern() && matcher::matches(&r.kind, folder_path)),
        );
    }
    matched.extend(
        rules
            .iter()
            .filter(|r| r.kind.is_path() && matcher::matches(&r.kind, folder_path)),
    );

    if !include_detached {
        matched.retain(|r| !r.kind.detached());
    }
    matched
}

fn aggregate<F: MergeFlags + Clone>(matched: &[&Rule<F>]) -> F {
    let mut acc = F::default();
    for rule in matched {
        acc.merge_from(&rule.flags);
    }
    acc
}

/// Overrides exclusion flags with the logical negation of the corresponding
/// whitelist flags.
///
/// The four behavior flags are only overridden where the exclusion side
/// asserted them; the two display flags are overridden unconditionally.
/// An unset whitelist flag negates to true, i.e. leaves the behavior
/// disabled.
fn apply_whitelist(bundle: &mut FlagBundle, wl: &WhitelistBundle) {
    let negate = |flag: Option<bool>| Some(!flag.unwrap_or(false));

    if bundle.disable_auto_create.is_some() {
        bundle.disable_auto_create = negate(wl.enable_auto_create);
    }
    if bundle.disable_folder_note.is_some() {
        bundle.disable_folder_note = negate(wl.enable_folder_note);
    }
    if bundle.disable_sync.is_some() {
        bundle.disable_sync = negate(wl.enable_sync);
    }
    if bundle.exclude_from_overview.is_some() {
        bundle.exclude_from_overview = negate(wl.show_in_overview);
    }

    bundle.enable_collapsing = negate(wl.disable_collapsing);
    bundle.show_folder_note_in_explorer = negate(wl.hide_in_explorer);
}
