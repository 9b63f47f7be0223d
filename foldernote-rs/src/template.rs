//! Folder-note name templating.
//!
//! A name template maps a folder name to its note's base name, e.g.
//! `"{{folder_name}} Index"` turns folder `Alpha` into note `Alpha Index`.
//! A template without the placeholder is a constant name: every folder note
//! shares the same base name and the folder name cannot be recovered from
//! it (the resolver falls back to the parent folder's name in that case).

/// Placeholder token substituted with the folder name.
pub const PLACEHOLDER: &str = "{{folder_name}}";

/// Renders the note base name for a folder.
pub fn render_name(template: &str, folder_name: &str) -> String {
    if template.contains(PLACEHOLDER) {
        template.replace(PLACEHOLDER, folder_name)
    } else {
        template.to_string()
    }
}

/// Recovers the folder name from a note base name, or `None` when the
/// candidate does not fit the template.
///
/// Constant-name templates return `None` unconditionally: the candidate
/// carries no folder name to extract.
pub fn extract_folder_name(template: &str, candidate: &str) -> Option<String> {
    let (prefix, suffix) = template.split_once(PLACEHOLDER)?;

    if prefix.is_empty() && suffix.is_empty() {
        return Some(candidate.to_string());
    }

    // Guard against prefix/suffix overlapping in a short candidate, e.g.
    // template "x{{folder_name}}x" against candidate "x".
    if candidate.len() < prefix.len() + suffix.len() {
        return None;
    }
    if !candidate.starts_with(prefix) || !candidate.ends_with(suffix) {
        return None;
    }

    Some(candidate[prefix.len()..candidate.len() - suffix.len()].to_string())
}
