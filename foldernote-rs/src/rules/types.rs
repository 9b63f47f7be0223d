//! Rule records and flag bundles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a rule selects folders: by path or by name pattern.
///
/// The two variants are discriminated by the serialized `kind` tag, matching
/// the host's persisted rule records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RuleKind {
    /// Matches one folder path exactly, optionally including its subtree.
    Path {
        path: String,
        #[serde(default)]
        include_subfolders: bool,
        /// Marks a deliberately broken folder-note binding, distinct from
        /// ordinary exclusion.
        #[serde(default)]
        detached: bool,
        /// Synthetic rules created during rename propagation are hidden
        /// from the settings UI.
        #[serde(default)]
        hidden_in_settings: bool,
    },
    /// Matches folder base names by wildcard or `{regex}` expression.
    Pattern { pattern: String },
}

impl RuleKind {
    /// True for the exact-path variant.
    pub fn is_path(&self) -> bool {
        matches!(self, RuleKind::Path { .. })
    }

    /// True for the name-pattern variant.
    pub fn is_pattern(&self) -> bool {
        matches!(self, RuleKind::Pattern { .. })
    }

    /// The detached marker, false for pattern rules.
    pub fn detached(&self) -> bool {
        matches!(self, RuleKind::Path { detached: true, .. })
    }
}

/// One rule record: an id for update/delete addressing, a position for
/// ordering, a selector, and a flag bundle.
///
/// Generic over the bundle so exclusion rules and whitelist rules share one
/// shape and one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<F> {
    pub id: Uuid,
    pub position: u32,
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(flatten)]
    pub flags: F,
}

impl<F: Default> Rule<F> {
    /// New exact-path rule with default flags.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: 0,
            kind: RuleKind::Path {
                path: path.into(),
                include_subfolders: false,
                detached: false,
                hidden_in_settings: false,
            },
            flags: F::default(),
        }
    }

    /// New name-pattern rule with default flags.
    pub fn for_pattern(pattern: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position: 0,
            kind: RuleKind::Pattern {
                pattern: pattern.into(),
            },
            flags: F::default(),
        }
    }
}

/// Tri-state flag merge: any asserted `true` wins over everything, an
/// asserted `false` wins over unset.
fn merge_flag(acc: &mut Option<bool>, value: Option<bool>) {
    match (*acc, value) {
        (Some(true), _) => {}
        (_, Some(true)) => *acc = Some(true),
        (_, Some(false)) => *acc = Some(false),
        (_, None) => {}
    }
}

/// Flag bundles that can be folded together during resolution.
pub trait MergeFlags: Default {
    /// Folds `other` into `self`, most-restrictive-wins per flag.
    fn merge_from(&mut self, other: &Self);

    /// True when no flag is asserted either way.
    fn is_unset(&self) -> bool;
}

macro_rules! flag_bundle {
    ($(#[$doc:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<bool>,
            )+
        }

        impl MergeFlags for $name {
            fn merge_from(&mut self, other: &Self) {
                $( merge_flag(&mut self.$field, other.$field); )+
            }

            fn is_unset(&self) -> bool {
                $( self.$field.is_none() )&&+
            }
        }
    };
}

flag_bundle! {
    /// Exclusion flags: each asserted flag turns a behavior off (or, for the
    /// two display flags, forces it) for matched folders.
    FlagBundle {
        disable_sync,
        disable_auto_create,
        disable_folder_note,
        enable_collapsing,
        exclude_from_overview,
        show_folder_note_in_explorer,
    }
}

flag_bundle! {
    /// Whitelist flags: positive overrides that re-enable what an exclusion
    /// rule disabled. Each corresponds to an exclusion flag by negation.
    WhitelistBundle {
        enable_sync,
        enable_auto_create,
        enable_folder_note,
        disable_collapsing,
        show_in_overview,
        hide_in_explorer,
    }
}

/// Fully-resolved behavior flags for one folder.
///
/// Produced only when at least one rule matched; "no rule matched at all"
/// is the caller-visible `None`, never an all-false bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectiveFlags {
    pub disable_sync: bool,
    pub disable_auto_create: bool,
    pub disable_folder_note: bool,
    pub enable_collapsing: bool,
    pub exclude_from_overview: bool,
    pub show_folder_note_in_explorer: bool,
    /// True when any matched rule carried the detached marker.
    pub detached: bool,
}

impl EffectiveFlags {
    /// Materializes an aggregated bundle, defaulting every unset flag to
    /// false. A matched-but-silent bundle therefore becomes all-false.
    pub fn from_bundle(bundle: &FlagBundle, detached: bool) -> Self {
        Self {
            disable_sync: bundle.disable_sync.unwrap_or(false),
            disable_auto_create: bundle.disable_auto_create.unwrap_or(false),
            disable_folder_note: bundle.disable_folder_note.unwrap_or(false),
            enable_collapsing: bundle.enable_collapsing.unwrap_or(false),
            exclude_from_overview: bundle.exclude_from_overview.unwrap_or(false),
            show_folder_note_in_explorer: bundle.show_folder_note_in_explorer.unwrap_or(false),
            detached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_true_wins() {
        let mut acc = FlagBundle {
            disable_sync: Some(true),
            ..Default::default()
        };
        acc.merge_from(&FlagBundle {
            disable_sync: Some(false),
            ..Default::default()
        });
        assert_eq!(acc.disable_sync, Some(true));

        let mut acc = FlagBundle {
            disable_sync: Some(false),
            ..Default::default()
        };
        acc.merge_from(&FlagBundle {
            disable_sync: Some(true),
            ..Default::default()
        });
        assert_eq!(acc.disable_sync, Some(true));
    }

    #[test]
    fn test_merge_false_beats_unset() {
        let mut acc = FlagBundle::default();
        acc.merge_from(&FlagBundle {
            disable_sync: Some(false),
            ..Default::default()
        });
        assert_eq!(acc.disable_sync, Some(false));
        assert_eq!(acc.disable_folder_note, None);
    }

    #[test]
    fn test_is_unset() {
        assert!(FlagBundle::default().is_unset());
        assert!(!FlagBundle {
            disable_sync: Some(false),
            ..Default::default()
        }
        .is_unset());
    }

    #[test]
    fn test_rule_serde_round_trip() {
        let rule: Rule<FlagBundle> = Rule {
            flags: FlagBundle {
                disable_sync: Some(true),
                ..Default::default()
            },
            position: 3,
            ..Rule::for_path("Projects/Alpha")
        };

        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"kind\":\"path\""));
        assert!(json.contains("\"disableSync\":true"));
        // Unset flags stay out of the blob.
        assert!(!json.contains("disableFolderNote"));

        let back: Rule<FlagBundle> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_pattern_rule_serde_tag() {
        let rule: Rule<WhitelistBundle> = Rule::for_pattern("*Draft*");
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"kind\":\"pattern\""));

        let back: Rule<WhitelistBundle> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, rule.kind);
    }

    #[test]
    fn test_effective_flags_materializes_all_false() {
        let flags = EffectiveFlags::from_bundle(&FlagBundle::default(), false);
        assert_eq!(flags, EffectiveFlags::default());
    }
}
