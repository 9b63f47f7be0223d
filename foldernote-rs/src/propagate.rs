//! Rename and move propagation between folders and their notes.
//!
//! Every branch pre-checks the destination before mutating: a collision
//! reverts the triggering rename and reports it instead of overwriting
//! anything.

use crate::error::Result;
use crate::path;
use crate::resolver;
use crate::rules::types::{FlagBundle, Rule, RuleKind};
use crate::settings::Settings;
use crate::template;
use crate::vault::{NodeKind, Vault};
use tracing::{debug, warn};
use uuid::Uuid;

/// What a rename/move event amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The folder's note was renamed to follow the folder.
    NoteRenamed { from: String, to: String },
    /// The folder was renamed to follow its note.
    FolderRenamed { from: String, to: String },
    /// A file became the folder note of `folder`.
    TurnedIntoFolderNote { folder: String, note: String },
    /// A file stopped being a folder note; nothing was renamed.
    DetachedNote { note: String },
    /// Only explorer decoration needs refreshing.
    DecorationOnly,
    /// The triggering rename was undone; `reason` is user-visible.
    Reverted { reason: String },
    /// Nothing to do.
    Ignored,
}

/// Temporarily disables sync for one folder while a propagated rename is in
/// flight, so the re-entrant event cannot trigger a second propagation.
///
/// Acquire either flags an existing exact-path rule (remembering its prior
/// `disable_sync`) or inserts a synthetic hidden rule; release restores or
/// removes it. Callers bracket the vault mutation with acquire/release and
/// must not return in between, so the release runs whether or not the
/// rename succeeded.
#[must_use = "suppression must be released after the guarded rename"]
pub struct SyncSuppression {
    prior: Prior,
}

enum Prior {
    Synthesized { id: Uuid },
    Flagged { id: Uuid, previous: Option<bool> },
}

impl SyncSuppression {
    pub fn acquire(settings: &mut Settings, folder_path: &str) -> Self {
        let existing = settings
            .excluded_folders
            .iter()
            .find(|r| matches!(&r.kind, RuleKind::Path { path, .. } if path == folder_path))
            .map(|r| r.id);

        let prior = match existing {
            Some(id) => {
                let rule = settings.excluded_folders.get_mut(id).unwrap();
                let previous = rule.flags.disable_sync;
                rule.flags.disable_sync = Some(true);
                Prior::Flagged { id, previous }
            }
            None => {
                let mut rule: Rule<FlagBundle> = Rule::for_path(folder_path);
                if let RuleKind::Path {
                    hidden_in_settings, ..
                } = &mut rule.kind
                {
                    *hidden_in_settings = true;
                }
                rule.flags.disable_sync = Some(true);
                let id = settings.excluded_folders.add(rule);
                Prior::Synthesized { id }
            }
        };
        Self { prior }
    }

    pub fn release(self, settings: &mut Settings) {
        match self.prior {
            Prior::Synthesized { id } => {
                settings.excluded_folders.delete(id);
            }
            Prior::Flagged { id, previous } => {
                if let Some(rule) = settings.excluded_folders.get_mut(id) {
                    rule.flags.disable_sync = previous;
                }
            }
        }
    }
}

/// Handles a completed rename/move of either a folder or a file.
///
/// The event arrives after the tree has mutated, so `new_path` is where the
/// subject currently lives.
pub fn on_rename(
    vault: &mut impl Vault,
    settings: &mut Settings,
    old_path: &str,
    new_path: &str,
) -> Result<RenameOutcome> {
    if old_path == new_path {
        return Ok(RenameOutcome::Ignored);
    }
    match vault.node(new_path) {
        Some(NodeKind::Folder) => folder_renamed(vault, settings, old_path, new_path),
        Some(NodeKind::File) => file_renamed(vault, settings, old_path, new_path),
        None => Ok(RenameOutcome::Ignored),
    }
}

/// True when sync toward `folder_path` is currently allowed.
fn sync_allowed(settings: &Settings, folder_path: &str) -> bool {
    if !settings.sync_folder_name {
        return false;
    }
    match crate::rules::resolve(settings, folder_path, false, false) {
        Some(flags) => !flags.disable_sync,
        None => true,
    }
}

fn folder_renamed(
    vault: &mut impl Vault,
    settings: &mut Settings,
    old_path: &str,
    new_path: &str,
) -> Result<RenameOutcome> {
    if path::parent(old_path) != path::parent(new_path) {
        // Folder moved to a new parent. Notes stored inside the folder
        // travel with it; notes stored in the parent folder are left
        // behind (known upstream gap, kept as documented behavior).
        debug!(old = old_path, new = new_path, "folder moved; no propagation");
        return Ok(RenameOutcome::Ignored);
    }

    let template_str = &settings.folder_note_name_template;
    let old_name = path::base_name(old_path);
    let new_name = path::base_name(new_path);
    let old_base = template::render_name(template_str, old_name);
    let new_base = template::render_name(template_str, new_name);
    if old_base == new_base {
        // Constant-name template: the note keeps its name regardless.
        return Ok(RenameOutcome::Ignored);
    }

    // The folder has already moved, so probe for the note under the new
    // location but the old rendered name.
    let Some(note) = resolver::resolve_note_named(vault, settings, new_path, old_name) else {
        return Ok(RenameOutcome::Ignored);
    };

    if !sync_allowed(settings, new_path) {
        debug!(folder = new_path, "folder rename: sync disabled");
        return Ok(RenameOutcome::Ignored);
    }

    // Keep whatever extension the existing note has.
    let ext = path::extension(&note).unwrap_or(settings.primary_extension());
    let stem = path::join(path::parent(&note), &new_base);
    let target = format!("{}.{}", stem, ext);

    if vault.exists(&target) {
        warn!(dest = %target, "folder rename collides with existing note; reverting");
        vault.rename(new_path, old_path)?;
        return Ok(RenameOutcome::Reverted {
            reason: format!("a note named \"{}\" already exists", target),
        });
    }

    vault.rename(&note, &target)?;
    debug!(from = %note, to = %target, "folder note renamed to follow folder");
    Ok(RenameOutcome::NoteRenamed {
        from: note,
        to: target,
    })
}

fn folder_note_disabled(settings: &Settings, folder_path: &str) -> bool {
    crate::rules::resolve(settings, folder_path, false, false)
        .map(|flags| flags.disable_folder_note)
        .unwrap_or(false)
}

fn file_renamed(
    vault: &mut impl Vault,
    settings: &mut Settings,
    old_path: &str,
    new_path: &str,
) -> Result<RenameOutcome> {
    let was_folder = resolver::resolve_folder(vault, settings, old_path);
    let now_folder = resolver::resolve_folder(vault, settings, new_path);
    let moved = path::parent(old_path) != path::parent(new_path);

    if moved {
        if !settings.sync_on_move {
            return Ok(RenameOutcome::DecorationOnly);
        }
        return Ok(match (was_folder, now_folder) {
            (_, Some(folder)) if !folder_note_disabled(settings, &folder) => {
                RenameOutcome::TurnedIntoFolderNote {
                    folder,
                    note: new_path.to_string(),
                }
            }
            (Some(_), _) => RenameOutcome::DetachedNote {
                note: new_path.to_string(),
            },
            _ => RenameOutcome::Ignored,
        });
    }

    // Renamed in place.
    if now_folder.is_some() {
        // Still a folder note (possibly of a different folder).
        return Ok(RenameOutcome::DecorationOnly);
    }

    let Some(folder) = was_folder else {
        return Ok(RenameOutcome::Ignored);
    };

    // The file stopped being a folder note. When it really was *the* note
    // of its folder, try to rename the folder along with it.
    let detached = Ok(RenameOutcome::DetachedNote {
        note: new_path.to_string(),
    });

    if !sync_allowed(settings, &folder) {
        debug!(folder = %folder, "note renamed away: sync disabled, detaching");
        return detached;
    }

    let new_stem = path::file_stem(new_path);
    let Some(wanted_name) =
        template::extract_folder_name(&settings.folder_note_name_template, new_stem)
    else {
        return detached;
    };
    if wanted_name.is_empty() || wanted_name == path::base_name(&folder) {
        return detached;
    }

    let target_folder = path::join(path::parent(&folder), &wanted_name);
    if vault.exists(&target_folder) {
        warn!(dest = %target_folder, "note rename collides with existing folder; reverting");
        vault.rename(new_path, old_path)?;
        return Ok(RenameOutcome::Reverted {
            reason: format!("a folder named \"{}\" already exists", target_folder),
        });
    }

    // The echoed folder event arrives for the destination path, so that is
    // where sync must be suppressed.
    let suppression = SyncSuppression::acquire(settings, &target_folder);
    let renamed = vault.rename(&folder, &target_folder);
    suppression.release(settings);
    renamed?;

    debug!(from = %folder, to = %target_folder, "folder renamed to follow note");
    Ok(RenameOutcome::FolderRenamed {
        from: folder,
        to: target_folder,
    })
}

/// Makes an arbitrary file the folder note of `folder_path` by renaming it
/// to the expected note path, with sync suppressed on the target folder
/// while the rename is in flight.
///
/// A file already occupying the expected path aborts the operation with the
/// tree untouched.
pub fn turn_into_folder_note(
    vault: &mut impl Vault,
    settings: &mut Settings,
    file_path: &str,
    folder_path: &str,
) -> Result<RenameOutcome> {
    if !vault.is_file(file_path) {
        return Ok(RenameOutcome::Ignored);
    }
    let Some(expected) = resolver::expected_note_path(settings, folder_path) else {
        return Ok(RenameOutcome::Ignored);
    };

    if let Some(flags) = crate::rules::resolve(settings, folder_path, false, false) {
        if flags.disable_folder_note {
            debug!(folder = folder_path, "folder notes disabled here");
            return Ok(RenameOutcome::Ignored);
        }
    }

    // Keep the file's own extension when it differs from the primary.
    let target = match path::extension(file_path) {
        Some(ext) if ext != settings.primary_extension() => {
            let primary_suffix = format!(".{}", settings.primary_extension());
            let stem = expected.strip_suffix(&primary_suffix).unwrap_or(&expected);
            format!("{}.{}", stem, ext)
        }
        _ => expected,
    };

    if target == file_path {
        return Ok(RenameOutcome::TurnedIntoFolderNote {
            folder: folder_path.to_string(),
            note: target,
        });
    }
    if vault.exists(&target) {
        warn!(dest = %target, "turn into folder note: destination occupied");
        return Ok(RenameOutcome::Reverted {
            reason: format!("a note named \"{}\" already exists", target),
        });
    }

    let suppression = SyncSuppression::acquire(settings, folder_path);
    let renamed = vault.rename(file_path, &target);
    suppression.release(settings);
    renamed?;

    Ok(RenameOutcome::TurnedIntoFolderNote {
        folder: folder_path.to_string(),
        note: target,
    })
}
