//! Disk-backed vault rooted at a directory.

use crate::error::{FolderNoteError, Result};
use crate::vault::{NodeKind, Vault};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};

/// A vault stored on disk. Vault paths map onto paths under `root`.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Opens an existing directory as a vault.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(FolderNoteError::NodeNotFound(
                root.to_string_lossy().into_owned(),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full(&self, vault_path: &str) -> PathBuf {
        self.root.join(vault_path)
    }

    fn relative_string(&self, p: &Path) -> Option<String> {
        let relative = p.strip_prefix(&self.root).ok()?;
        // Skip hidden files and directories.
        if relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
        {
            return None;
        }
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }
}

impl Vault for FsVault {
    fn node(&self, p: &str) -> Option<NodeKind> {
        if p.is_empty() {
            return Some(NodeKind::Folder);
        }
        let full = self.full(p);
        if full.is_file() {
            Some(NodeKind::File)
        } else if full.is_dir() {
            Some(NodeKind::Folder)
        } else {
            None
        }
    }

    fn create_folder(&mut self, p: &str) -> Result<()> {
        if self.exists(p) {
            return Err(FolderNoteError::FolderAlreadyExists(p.to_string()));
        }
        fs::create_dir_all(self.full(p))?;
        Ok(())
    }

    fn create_file(&mut self, p: &str, content: &str) -> Result<()> {
        if self.exists(p) {
            return Err(FolderNoteError::NoteAlreadyExists(p.to_string()));
        }
        let full = self.full(p);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
        Ok(())
    }

    fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let Some(kind) = self.node(old) else {
            return Err(FolderNoteError::NodeNotFound(old.to_string()));
        };
        if self.exists(new) {
            return Err(match kind {
                NodeKind::File => FolderNoteError::NoteAlreadyExists(new.to_string()),
                NodeKind::Folder => FolderNoteError::FolderAlreadyExists(new.to_string()),
            });
        }

        let new_full = self.full(new);
        if let Some(parent) = new_full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(self.full(old), new_full)?;
        Ok(())
    }

    fn delete(&mut self, p: &str) -> Result<()> {
        match self.node(p) {
            None => Err(FolderNoteError::NodeNotFound(p.to_string())),
            Some(NodeKind::File) => {
                fs::remove_file(self.full(p))?;
                Ok(())
            }
            Some(NodeKind::Folder) => {
                fs::remove_dir_all(self.full(p))?;
                Ok(())
            }
        }
    }

    fn read_file(&self, p: &str) -> Result<String> {
        match self.node(p) {
            Some(NodeKind::File) => Ok(fs::read_to_string(self.full(p))?),
            Some(NodeKind::Folder) => Err(FolderNoteError::NotAFile(p.to_string())),
            None => Err(FolderNoteError::NodeNotFound(p.to_string())),
        }
    }

    fn folders(&self) -> Vec<String> {
        let pattern = self.root.join("**/*");
        let pattern_str = pattern.to_string_lossy();

        let mut out = Vec::new();
        let Ok(entries) = glob(&pattern_str) else {
            return out;
        };
        for entry in entries {
            match entry {
                Ok(p) if p.is_dir() => {
                    if let Some(rel) = self.relative_string(&p) {
                        out.push(rel);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("glob error while listing folders: {}", e);
                }
            }
        }
        out.sort();
        out
    }
}
