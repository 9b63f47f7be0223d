//! Foldernote - folder-note binding for Obsidian-style vaults.
//!
//! # Overview
//!
//! Foldernote binds a "folder note" (a note file representing a folder) to
//! each folder in a vault and keeps the pair consistent as the tree
//! mutates:
//! - Note name templating and storage-location resolution (inside the
//!   folder, beside it, or at the vault root)
//! - Exclusion and whitelist rules (exact paths and name patterns) folded
//!   into effective behavior flags per folder
//! - Bidirectional rename propagation (folder follows note, note follows
//!   folder) with collision-safe reverts
//! - Explorer decoration data and lifecycle hooks for the host application
//!
//! # Example
//!
//! ```no_run
//! use foldernote::{FsVault, JsonSettingsStore, Manager};
//!
//! let vault = FsVault::open("/path/to/vault").unwrap();
//! let store = JsonSettingsStore::new("/path/to/vault/.foldernote.json");
//! let mut manager = Manager::open(vault, store).unwrap();
//!
//! // Pair every folder with its note at startup.
//! for pairing in manager.scan() {
//!     println!("{} -> {}", pairing.folder, pairing.note);
//! }
//!
//! // React to a completed rename in the tree.
//! let outcome = manager.on_rename("Projects/Alpha", "Projects/Beta").unwrap();
//! println!("{:?}", outcome);
//! ```

pub mod error;
pub mod manager;
pub mod path;
pub mod propagate;
pub mod resolver;
pub mod rules;
pub mod settings;
pub mod template;
pub mod vault;

// Re-export main types at crate root
pub use error::{FolderNoteError, Result};
pub use manager::{Decoration, FolderNotePairing, Manager};
pub use propagate::{RenameOutcome, SyncSuppression};
pub use rules::{EffectiveFlags, FlagBundle, Rule, RuleKind, RuleList, WhitelistBundle};
pub use settings::{JsonSettingsStore, MemorySettingsStore, Settings, SettingsStore, StorageLocation};
pub use vault::{FsVault, MemoryVault, NodeKind, Vault};
