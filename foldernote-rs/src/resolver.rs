//! Folder-note resolution: folder path -> note file and back.

use crate::error::{FolderNoteError, Result};
use crate::path;
use crate::settings::{Settings, StorageLocation};
use crate::template;
use crate::vault::Vault;

/// The folder (or root) a folder's note lives in.
fn container(settings: &Settings, folder_path: &str) -> String {
    match settings.storage_location {
        StorageLocation::InsideFolder => folder_path.to_string(),
        StorageLocation::ParentFolder => path::parent(folder_path).to_string(),
        StorageLocation::VaultRoot => String::new(),
    }
}

/// Extensions to probe, in order: primary, its canvas/markdown partner,
/// then the remaining supported extensions as configured.
fn extension_order(settings: &Settings) -> Vec<String> {
    let primary = settings.primary_extension();
    let mut order = vec![primary.to_string()];

    // md and canvas are a two-way fallback pair.
    match primary {
        "md" => order.push("canvas".to_string()),
        "canvas" => order.push("md".to_string()),
        _ => {}
    }

    for ext in &settings.supported_extensions {
        let ext = ext.trim_start_matches('.');
        if !order.iter().any(|o| o == ext) {
            order.push(ext.to_string());
        }
    }
    order
}

fn is_supported_extension(settings: &Settings, ext: &str) -> bool {
    extension_order(settings).iter().any(|o| o == ext)
}

/// Where the note for `folder_path` is expected, using the primary
/// extension and no existence check. `None` for the empty path.
pub fn expected_note_path(settings: &Settings, folder_path: &str) -> Option<String> {
    if folder_path.is_empty() {
        return None;
    }
    expected_note_path_named(settings, folder_path, path::base_name(folder_path))
}

/// Like [`expected_note_path`] but rendering the template over an explicit
/// folder name instead of the path's base name. Rename propagation uses
/// this to probe under a folder's previous name.
pub fn expected_note_path_named(
    settings: &Settings,
    folder_path: &str,
    folder_name: &str,
) -> Option<String> {
    if folder_path.is_empty() {
        return None;
    }
    let base = template::render_name(&settings.folder_note_name_template, folder_name);
    let stem = path::join(&container(settings, folder_path), &base);
    Some(format!("{}.{}", stem, settings.primary_extension()))
}

/// Finds the existing note file for a folder, probing the extension
/// fallback chain. Total: malformed or empty paths yield `None`.
pub fn resolve_note(vault: &impl Vault, settings: &Settings, folder_path: &str) -> Option<String> {
    resolve_note_named(vault, settings, folder_path, path::base_name(folder_path))
}

/// [`resolve_note`] with an explicit folder name (see
/// [`expected_note_path_named`]).
pub fn resolve_note_named(
    vault: &impl Vault,
    settings: &Settings,
    folder_path: &str,
    folder_name: &str,
) -> Option<String> {
    if folder_path.is_empty() {
        return None;
    }

    let base = template::render_name(&settings.folder_note_name_template, folder_name);
    let stem = path::join(&container(settings, folder_path), &base);

    extension_order(settings)
        .iter()
        .map(|ext| format!("{}.{}", stem, ext))
        .find(|candidate| vault.is_file(candidate))
}

/// Inverse resolution: the folder a candidate note file belongs to, or
/// `None` when the file is not in folder-note position.
pub fn resolve_folder(
    vault: &impl Vault,
    settings: &Settings,
    file_path: &str,
) -> Option<String> {
    if file_path.is_empty() {
        return None;
    }
    let ext = path::extension(file_path)?;
    if !is_supported_extension(settings, ext) {
        return None;
    }

    let stem = path::file_stem(file_path);
    let file_container = path::parent(file_path);
    let template_str = &settings.folder_note_name_template;

    let folder_name = match template::extract_folder_name(template_str, stem) {
        Some(name) => name,
        None => {
            // Constant-name template with the note inside its own folder:
            // the parent folder's name stands in for the extracted name.
            if stem == template_str
                && settings.storage_location == StorageLocation::InsideFolder
                && !file_container.is_empty()
            {
                path::base_name(file_container).to_string()
            } else {
                return None;
            }
        }
    };

    let folder_path = match settings.storage_location {
        // The note lives inside the folder it names.
        StorageLocation::InsideFolder => {
            if path::base_name(file_container) != folder_name {
                return None;
            }
            file_container.to_string()
        }
        // The note lives beside the folder.
        StorageLocation::ParentFolder => path::join(file_container, &folder_name),
        // Root-stored notes can bind a folder anywhere in the vault; take
        // the first folder with that name, in sorted path order.
        StorageLocation::VaultRoot => {
            if !file_container.is_empty() {
                return None;
            }
            vault
                .folders()
                .into_iter()
                .find(|f| path::base_name(f) == folder_name)?
        }
    };

    vault.is_folder(&folder_path).then_some(folder_path)
}

/// Creates the folder note for a folder, empty-bodied, at its expected
/// path. Fails when the folder is absent or the note already exists.
pub fn create_folder_note(
    vault: &mut impl Vault,
    settings: &Settings,
    folder_path: &str,
) -> Result<String> {
    if !vault.is_folder(folder_path) {
        return Err(FolderNoteError::NotAFolder(folder_path.to_string()));
    }
    let note_path = expected_note_path(settings, folder_path)
        .ok_or_else(|| FolderNoteError::NotAFolder(folder_path.to_string()))?;
    if vault.exists(&note_path) {
        return Err(FolderNoteError::NoteAlreadyExists(note_path));
    }

    vault.create_file(&note_path, "")?;
    Ok(note_path)
}
