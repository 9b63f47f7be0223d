//! Vault path arithmetic.
//!
//! Vault paths are forward-slash separated strings relative to the vault
//! root (the host application's addressing scheme). The empty string is the
//! vault root itself. These helpers never touch the filesystem.

/// Returns the last path segment, or the path itself if it has none.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns the parent path, or `""` for a top-level node.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Joins a container path and a name. An empty container degrades to the
/// bare name (vault-root container).
pub fn join(container: &str, name: &str) -> String {
    if container.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", container, name)
    }
}

/// Returns the file name without its extension.
pub fn file_stem(path: &str) -> &str {
    let name = base_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Returns the extension without the dot, if any.
pub fn extension(path: &str) -> Option<&str> {
    let name = base_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}

/// True when `path` is `ancestor` itself or lies below it.
///
/// Segment boundaries are respected: `Foo` is not an ancestor of `FooBar`.
pub fn is_self_or_descendant(path: &str, ancestor: &str) -> bool {
    path == ancestor || path.starts_with(&format!("{}/", ancestor))
}
