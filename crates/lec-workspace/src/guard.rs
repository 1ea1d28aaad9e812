//! Containment checks for caller-supplied relative paths.
//!
//! A path is accepted only if it stays under `root` both lexically and after
//! resolving symlinks on the part of it that already exists.

use std::path::{Component, Path, PathBuf};

use crate::error::WorkspaceError;

/// Resolve `rel` under `root`, rejecting anything that could land outside it.
///
/// Backslashes are treated as separators. Absolute paths, empty paths, paths
/// that normalize to `root` itself, and paths that climb out through `..` or
/// an existing symlink are all rejected.
///
/// # Errors
///
/// Returns `WorkspaceError::PathTraversal` naming the rejected input.
pub fn resolve_within(root: &Path, rel: &str) -> Result<PathBuf, WorkspaceError> {
    let normalized = normalize(rel).ok_or_else(|| WorkspaceError::traversal(rel))?;
    let target = root.join(&normalized);

    if escapes_via_symlink(root, &target) {
        tracing::warn!(path = rel, root = %root.display(), "symlink escape rejected");
        return Err(WorkspaceError::traversal(rel));
    }

    Ok(target)
}

/// Lexically normalize a relative path. `None` if it is absolute, empty,
/// or climbs above its starting point.
fn normalize(rel: &str) -> Option<PathBuf> {
    if rel.trim().is_empty() || rel.contains('\0') {
        return None;
    }
    let unified = rel.replace('\\', "/");
    if unified.starts_with('/') {
        return None;
    }

    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(parts.iter().collect())
}

/// Whether the deepest existing ancestor of `target` resolves outside `root`.
fn escapes_via_symlink(root: &Path, target: &Path) -> bool {
    let Ok(canonical_root) = root.canonicalize() else {
        // Nothing exists yet, so nothing can point elsewhere.
        return false;
    };

    let mut ancestor = Some(target);
    while let Some(path) = ancestor {
        if path.symlink_metadata().is_ok() {
            return match path.canonicalize() {
                Ok(resolved) => !resolved.starts_with(&canonical_root),
                // Dangling symlink: refuse rather than follow it on write.
                Err(_) => true,
            };
        }
        if path == root {
            return false;
        }
        ancestor = path.parent();
    }
    false
}
