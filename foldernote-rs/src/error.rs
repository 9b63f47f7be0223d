//! Error types for foldernote.

use thiserror::Error;

/// Main error type for folder-note operations.
///
/// Expected absence (no folder note, no matching rule) is modelled with
/// `Option`, not with an error variant: every resolver is total.
#[derive(Error, Debug)]
pub enum FolderNoteError {
    #[error("Note already exists: {0}")]
    NoteAlreadyExists(String),

    #[error("Folder already exists: {0}")]
    FolderAlreadyExists(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Not a folder: {0}")]
    NotAFolder(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for folder-note operations.
pub type Result<T> = std::result::Result<T, FolderNoteError>;
