//! Process-wide configuration and its persistence.

use crate::error::Result;
use crate::rules::{FlagBundle, RuleList, WhitelistBundle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a folder note physically lives relative to its folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageLocation {
    /// Inside the folder it describes (`Projects/Alpha/Alpha.md`).
    #[default]
    InsideFolder,
    /// Beside the folder in its parent (`Projects/Alpha.md`).
    ParentFolder,
    /// At the vault root (`Alpha.md`).
    VaultRoot,
}

/// Global settings, serialized as the host's camelCase JSON blob.
///
/// Loaded once at startup; saved after every mutating operation. The rule
/// collections live here because they are part of the persisted blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Note name template containing one `{{folder_name}}` placeholder
    /// (or none, for a constant note name).
    pub folder_note_name_template: String,
    /// Primary extension, with leading dot (".md" or ".canvas").
    pub folder_note_extension: String,
    /// Extensions (without dot) tried when the primary candidate is absent.
    pub supported_extensions: Vec<String>,
    pub storage_location: StorageLocation,
    /// Rename a folder's note when the folder is renamed, and vice versa.
    pub sync_folder_name: bool,
    /// React to files moving into or out of folder-note position.
    pub sync_on_move: bool,
    /// Delete an orphaned folder note when its folder is deleted.
    pub sync_on_delete: bool,
    /// Create a folder note automatically for every new folder.
    pub auto_create_folder_note: bool,
    pub excluded_folders: RuleList<FlagBundle>,
    pub whitelist_folders: RuleList<WhitelistBundle>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            folder_note_name_template: crate::template::PLACEHOLDER.to_string(),
            folder_note_extension: ".md".to_string(),
            supported_extensions: vec!["md".to_string(), "canvas".to_string()],
            storage_location: StorageLocation::InsideFolder,
            sync_folder_name: true,
            sync_on_move: true,
            sync_on_delete: false,
            auto_create_folder_note: false,
            excluded_folders: RuleList::new(),
            whitelist_folders: RuleList::new(),
        }
    }
}

impl Settings {
    /// Primary extension without the leading dot.
    pub fn primary_extension(&self) -> &str {
        self.folder_note_extension.trim_start_matches('.')
    }
}

/// Persistence seam for settings; the host supplies the real one.
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// File-backed store writing the JSON blob atomically.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsStore for JsonSettingsStore {
    /// Missing file means first run: defaults.
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_vec_pretty(settings)?;
        atomic_write(&self.path, &json)
    }
}

/// In-memory store for tests and hosts that persist settings themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    pub saved: Option<Settings>,
    pub save_count: usize,
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        self.saved = Some(settings.clone());
        self.save_count += 1;
        Ok(())
    }
}

/// Atomic write: write to a temp file in the same directory, then rename.
fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.folder_note_name_template, "{{folder_name}}");
        assert_eq!(s.primary_extension(), "md");
        assert_eq!(s.storage_location, StorageLocation::InsideFolder);
        assert!(s.sync_folder_name);
        assert!(s.excluded_folders.is_empty());
    }

    #[test]
    fn test_serde_camel_case() {
        let s = Settings::default();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"folderNoteNameTemplate\""));
        assert!(json.contains("\"storageLocation\":\"insideFolder\""));
        assert!(json.contains("\"excludedFolders\":[]"));
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"storageLocation":"parentFolder"}"#).unwrap();
        assert_eq!(s.storage_location, StorageLocation::ParentFolder);
        assert_eq!(s.folder_note_extension, ".md");
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonSettingsStore::new(dir.path().join("data.json"));

        // First run: defaults.
        assert_eq!(store.load().unwrap(), Settings::default());

        let mut settings = Settings::default();
        settings.sync_folder_name = false;
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemorySettingsStore::default();
        store.save(&Settings::default()).unwrap();
        store.save(&Settings::default()).unwrap();
        assert_eq!(store.save_count, 2);
    }
}
