//! In-memory vault tree for tests and embedders.

use crate::error::{FolderNoteError, Result};
use crate::path;
use crate::vault::{NodeKind, Vault};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Folder,
    File(String),
}

/// A vault held entirely in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    nodes: BTreeMap<String, Node>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every missing ancestor of `p` as a folder.
    fn ensure_parents(&mut self, p: &str) {
        let mut parent = path::parent(p);
        while !parent.is_empty() && !self.nodes.contains_key(parent) {
            self.nodes.insert(parent.to_string(), Node::Folder);
            parent = path::parent(parent);
        }
    }

    /// Paths of `folder` and everything below it, in map order.
    fn subtree(&self, folder: &str) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|p| path::is_self_or_descendant(p, folder))
            .cloned()
            .collect()
    }
}

impl Vault for MemoryVault {
    fn node(&self, p: &str) -> Option<NodeKind> {
        if p.is_empty() {
            return Some(NodeKind::Folder);
        }
        self.nodes.get(p).map(|n| match n {
            Node::Folder => NodeKind::Folder,
            Node::File(_) => NodeKind::File,
        })
    }

    fn create_folder(&mut self, p: &str) -> Result<()> {
        if self.exists(p) {
            return Err(FolderNoteError::FolderAlreadyExists(p.to_string()));
        }
        self.ensure_parents(p);
        self.nodes.insert(p.to_string(), Node::Folder);
        Ok(())
    }

    fn create_file(&mut self, p: &str, content: &str) -> Result<()> {
        if self.exists(p) {
            return Err(FolderNoteError::NoteAlreadyExists(p.to_string()));
        }
        self.ensure_parents(p);
        self.nodes.insert(p.to_string(), Node::File(content.to_string()));
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

        self.ensure_parents(new);
        match kind {
            NodeKind::File => {
                let node = self.nodes.remove(old).unwrap();
                self.nodes.insert(new.to_string(), node);
            }
            NodeKind::Folder => {
                for p in self.subtree(old) {
                    let node = self.nodes.remove(&p).unwrap();
                    let moved = format!("{}{}", new, &p[old.len()..]);
                    self.nodes.insert(moved, node);
                }
            }
        }
        Ok(())
    }

    fn delete(&mut self, p: &str) -> Result<()> {
        match self.node(p) {
            None => Err(FolderNoteError::NodeNotFound(p.to_string())),
            Some(NodeKind::File) => {
                self.nodes.remove(p);
                Ok(())
            }
            Some(NodeKind::Folder) => {
                for sub in self.subtree(p) {
                    self.nodes.remove(&sub);
                }
                Ok(())
            }
        }
    }

    fn read_file(&self, p: &str) -> Result<String> {
        match self.nodes.get(p) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Folder) => Err(FolderNoteError::NotAFile(p.to_string())),
            None => Err(FolderNoteError::NodeNotFound(p.to_string())),
        }
    }

    fn folders(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|(_, n)| **n == Node::Folder)
            .map(|(p, _)| p.clone())
            .collect()
    }
}
