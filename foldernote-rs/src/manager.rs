//! Lifecycle hooks: translates tree events into resolution, propagation,
//! and explorer decoration, and owns the settings lifecycle.

use crate::error::Result;
use crate::propagate::{self, RenameOutcome};
use crate::resolver;
use crate::rules::{self, EffectiveFlags, FlagBundle, Rule, WhitelistBundle};
use crate::settings::{Settings, SettingsStore, StorageLocation};
use crate::vault::{NodeKind, Vault};
use tracing::debug;
use uuid::Uuid;

/// Explorer decoration computed for one tree node. Rendering is the host's
/// job; this is the data it renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoration {
    /// Set on a file that is some folder's note.
    pub bound_folder: Option<String>,
    /// Set on a folder that has a note.
    pub folder_note: Option<String>,
    /// Show the note as its own row in the file explorer.
    pub show_note_in_explorer: bool,
    /// Collapse the folder when its name is clicked.
    pub collapsible: bool,
    /// Leave this folder out of folder overviews.
    pub excluded_from_overview: bool,
}

/// One folder paired with its resolved note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNotePairing {
    pub folder: String,
    pub note: String,
}

/// Owns a vault handle, settings, and their store; entry point for hosts.
///
/// Settings are loaded once at construction and saved after every rule
/// mutation. All queries (`resolve_note`, `flags`, `decoration`) are
/// read-only and cheap enough to call per rendered tree node.
pub struct Manager<V: Vault, S: SettingsStore> {
    vault: V,
    settings: Settings,
    store: S,
}

impl<V: Vault, S: SettingsStore> Manager<V, S> {
    /// Loads settings from the store and wraps the vault.
    pub fn open(vault: V, store: S) -> Result<Self> {
        let settings = store.load()?;
        Ok(Self {
            vault,
            settings,
            store,
        })
    }

    pub fn vault(&self) -> &V {
        &self.vault
    }

    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings access for the host's settings screen. The caller
    /// is responsible for persisting afterwards (see [`Manager::persist`]).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Saves the current settings through the store.
    pub fn persist(&mut self) -> Result<()> {
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        self.store.save(&self.settings)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The folder's note file, if one exists.
    pub fn resolve_note(&self, folder_path: &str) -> Option<String> {
        resolver::resolve_note(&self.vault, &self.settings, folder_path)
    }

    /// The folder a candidate note file belongs to, if any.
    pub fn resolve_folder(&self, file_path: &str) -> Option<String> {
        resolver::resolve_folder(&self.vault, &self.settings, file_path)
    }

    /// Effective rule flags for a folder; `None` when no rule matches.
    pub fn flags(
        &self,
        folder_path: &str,
        include_detached: bool,
        path_only: bool,
    ) -> Option<EffectiveFlags> {
        rules::resolve(&self.settings, folder_path, include_detached, path_only)
    }

    /// Decoration data for one rendered tree node.
    pub fn decoration(&self, path: &str) -> Decoration {
        match self.vault.node(path) {
            Some(NodeKind::File) => {
                let bound_folder = self
                    .resolve_folder(path)
                    .filter(|folder| !self.folder_note_disabled(folder));
                match bound_folder {
                    Some(folder) => {
                        let flags = self.flags(&folder, false, false).unwrap_or_default();
                        Decoration {
                            bound_folder: Some(folder),
                            show_note_in_explorer: flags.show_folder_note_in_explorer,
                            ..Default::default()
                        }
                    }
                    None => Decoration::default(),
                }
            }
            Some(NodeKind::Folder) => {
                let flags = self.flags(path, false, false).unwrap_or_default();
                let folder_note = if flags.disable_folder_note {
                    None
                } else {
                    self.resolve_note(path)
                };
                Decoration {
                    collapsible: folder_note.is_some() && flags.enable_collapsing,
                    excluded_from_overview: flags.exclude_from_overview,
                    show_note_in_explorer: flags.show_folder_note_in_explorer,
                    folder_note,
                    ..Default::default()
                }
            }
            None => Decoration::default(),
        }
    }

    /// Startup pass: every folder paired with its resolved note.
    pub fn scan(&self) -> Vec<FolderNotePairing> {
        self.vault
            .folders()
            .into_iter()
            .filter(|folder| !self.folder_note_disabled(folder))
            .filter_map(|folder| {
                let note = self.resolve_note(&folder)?;
                Some(FolderNotePairing { folder, note })
            })
            .collect()
    }

    fn folder_note_disabled(&self, folder_path: &str) -> bool {
        self.flags(folder_path, false, false)
            .map(|f| f.disable_folder_note)
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Creates the folder note for a folder at its expected path.
    pub fn create_folder_note(&mut self, folder_path: &str) -> Result<String> {
        resolver::create_folder_note(&mut self.vault, &self.settings, folder_path)
    }

    /// Makes an existing file the note of `folder_path`.
    pub fn turn_into_folder_note(
        &mut self,
        file_path: &str,
        folder_path: &str,
    ) -> Result<RenameOutcome> {
        propagate::turn_into_folder_note(&mut self.vault, &mut self.settings, file_path, folder_path)
    }

    // ------------------------------------------------------------------
    // Tree events (delivered after the mutation completed)
    // ------------------------------------------------------------------

    /// A node was created. Auto-creates a folder note when configured and no
    /// rule objects. Returns the created note's path.
    pub fn on_create(&mut self, path: &str) -> Result<Option<String>> {
        if !self.settings.auto_create_folder_note || !self.vault.is_folder(path) {
            return Ok(None);
        }
        if let Some(flags) = self.flags(path, false, false) {
            if flags.disable_auto_create || flags.disable_folder_note {
                debug!(folder = path, "auto-create disabled by rule");
                return Ok(None);
            }
        }
        if self.resolve_note(path).is_some() {
            return Ok(None);
        }

        let note = resolver::create_folder_note(&mut self.vault, &self.settings, path)?;
        debug!(folder = path, note = %note, "auto-created folder note");
        Ok(Some(note))
    }

    /// A node was renamed or moved.
    pub fn on_rename(&mut self, old_path: &str, new_path: &str) -> Result<RenameOutcome> {
        propagate::on_rename(&mut self.vault, &mut self.settings, old_path, new_path)
    }

    /// A node was deleted. `kind` is the kind of the node that was removed;
    /// the tree no longer holds it. Returns the path of a note deleted in
    /// response.
    pub fn on_delete(&mut self, path: &str, kind: NodeKind) -> Result<Option<String>> {
        if kind != NodeKind::Folder || !self.settings.sync_on_delete {
            return Ok(None);
        }
        // A note stored inside the folder is already gone with it.
        if self.settings.storage_location == StorageLocation::InsideFolder {
            return Ok(None);
        }
        let Some(note) = self.resolve_note(path) else {
            return Ok(None);
        };

        self.vault.delete(&note)?;
        debug!(folder = path, note = %note, "deleted orphaned folder note");
        Ok(Some(note))
    }

    // ------------------------------------------------------------------
    // Rule editing (each mutation persists through the settings store)
    // ------------------------------------------------------------------

    pub fn add_exclusion(&mut self, rule: Rule<FlagBundle>) -> Result<Uuid> {
        let id = self.settings.excluded_folders.add(rule);
        self.save()?;
        Ok(id)
    }

    pub fn delete_exclusion(&mut self, id: Uuid) -> Result<bool> {
        let removed = self.settings.excluded_folders.delete(id);
        if removed {
            self.settings.excluded_folders.resync();
            self.save()?;
        }
        Ok(removed)
    }

    pub fn update_exclusion(&mut self, id: Uuid, rule: Rule<FlagBundle>) -> Result<bool> {
        let updated = self.settings.excluded_folders.update(id, rule);
        if updated {
            self.save()?;
        }
        Ok(updated)
    }

    pub fn move_exclusion(&mut self, id: Uuid, delta: i64) -> Result<bool> {
        let moved = self.settings.excluded_folders.move_by(id, delta);
        if moved {
            self.settings.excluded_folders.resync();
            self.save()?;
        }
        Ok(moved)
    }

    pub fn add_whitelist(&mut self, rule: Rule<WhitelistBundle>) -> Result<Uuid> {
        let id = self.settings.whitelist_folders.add(rule);
        self.save()?;
        Ok(id)
    }

    pub fn delete_whitelist(&mut self, id: Uuid) -> Result<bool> {
        let removed = self.settings.whitelist_folders.delete(id);
        if removed {
            self.settings.whitelist_folders.resync();
            self.save()?;
        }
        Ok(removed)
    }

    pub fn update_whitelist(&mut self, id: Uuid, rule: Rule<WhitelistBundle>) -> Result<bool> {
        let updated = self.settings.whitelist_folders.update(id, rule);
        if updated {
            self.save()?;
        }
        Ok(updated)
    }

    pub fn move_whitelist(&mut self, id: Uuid, delta: i64) -> Result<bool> {
        let moved = self.settings.whitelist_folders.move_by(id, delta);
        if moved {
            self.settings.whitelist_folders.resync();
            self.save()?;
        }
        Ok(moved)
    }
}
