//! The mutable folder/file tree the engine operates on.
//!
//! The host application owns the real tree; this trait is the contract the
//! engine consumes. Paths are vault-rooted forward-slash strings; `""` is
//! the vault root folder. Events are delivered one at a time after the
//! mutation has completed, so all operations here are synchronous.

mod fs;
mod memory;

pub use fs::FsVault;
pub use memory::MemoryVault;

use crate::error::Result;

/// What a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
}

/// Minimal tree contract consumed by the engine.
pub trait Vault {
    /// Kind of the node at `path`, or `None` when absent. The empty path is
    /// always the root folder.
    fn node(&self, path: &str) -> Option<NodeKind>;

    /// Creates a folder (and any missing parents).
    fn create_folder(&mut self, path: &str) -> Result<()>;

    /// Creates a file with the given content. Fails if the path is taken.
    fn create_file(&mut self, path: &str, content: &str) -> Result<()>;

    /// Moves a node (file, or folder with its subtree) to a new path.
    /// Fails if the destination exists; missing destination parents are
    /// created.
    fn rename(&mut self, old: &str, new: &str) -> Result<()>;

    /// Deletes a node; a folder goes with its subtree.
    fn delete(&mut self, path: &str) -> Result<()>;

    /// Reads a file's content.
    fn read_file(&self, path: &str) -> Result<String>;

    /// All folder paths in the vault, sorted, root excluded.
    fn folders(&self) -> Vec<String>;

    fn exists(&self, path: &str) -> bool {
        self.node(path).is_some()
    }

    fn is_file(&self, path: &str) -> bool {
        self.node(path) == Some(NodeKind::File)
    }

    fn is_folder(&self, path: &str) -> bool {
        self.node(path) == Some(NodeKind::Folder)
    }
}
