//! Make a directory tree match a set of files exactly.
//!
//! Storage is authoritative. Before every toolchain invocation the `src/` and
//! `test/` trees are rewritten from the persisted files, which also clears out
//! anything a previous, interrupted request left behind.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::WorkspaceError;
use crate::guard::resolve_within;

/// What a [`write_files`] call changed on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Relative paths whose content was (re)written.
    pub written: Vec<String>,
    /// Relative paths removed because they were not in the set.
    pub removed: Vec<String>,
}

/// Replace the contents of `root` with exactly `files` (relative path, content).
///
/// All paths are validated before anything is touched: a single bad path
/// fails the whole call with nothing written. Files already holding the
/// right content are left alone.
///
/// # Errors
///
/// `PathTraversal` for an escaping path, `Io`/`Walk` for filesystem failures.
pub fn write_files<'a, I>(root: &Path, files: I) -> Result<SyncReport, WorkspaceError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let resolved = files
        .into_iter()
        .map(|(rel, content)| resolve_within(root, rel).map(|path| (path, content)))
        .collect::<Result<Vec<_>, _>>()?;

    fs::create_dir_all(root).map_err(WorkspaceError::io(root))?;

    let keep: HashSet<&PathBuf> = resolved.iter().map(|(path, _)| path).collect();
    let mut report = SyncReport::default();

    for existing in walk_files(root)? {
        if !keep.contains(&existing) {
            fs::remove_file(&existing).map_err(WorkspaceError::io(&existing))?;
            report.removed.push(relative(root, &existing));
        }
    }
    remove_empty_dirs(root, root)?;

    for (path, content) in &resolved {
        if fs::read(path).is_ok_and(|current| current == content.as_bytes()) {
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(WorkspaceError::io(parent))?;
        }
        fs::write(path, content).map_err(WorkspaceError::io(path))?;
        report.written.push(relative(root, path));
    }

    tracing::debug!(
        root = %root.display(),
        written = report.written.len(),
        removed = report.removed.len(),
        "synchronized directory"
    );
    Ok(report)
}

/// List every file under `root` as a sorted, `/`-separated relative path.
/// A missing `root` is an empty tree.
///
/// # Errors
///
/// Returns `WorkspaceError::Walk` if the directory cannot be traversed.
pub fn read_tree(root: &Path) -> Result<Vec<String>, WorkspaceError> {
    let mut files: Vec<String> = walk_files(root)?
        .iter()
        .map(|path| relative(root, path))
        .collect();
    files.sort();
    Ok(files)
}

fn walk_files(root: &Path) -> Result<Vec<PathBuf>, WorkspaceError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .build();
    for entry in walker {
        let entry = entry?;
        if entry
            .file_type()
            .is_some_and(|ft| ft.is_file() || ft.is_symlink())
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Remove directories under `dir` left empty by pruning. `root` itself stays.
fn remove_empty_dirs(root: &Path, dir: &Path) -> Result<bool, WorkspaceError> {
    let mut empty = true;
    for entry in fs::read_dir(dir).map_err(WorkspaceError::io(dir))? {
        let entry = entry.map_err(WorkspaceError::io(dir))?;
        let path = entry.path();
        let is_dir = entry.file_type().is_ok_and(|ft| ft.is_dir());
        if is_dir && remove_empty_dirs(root, &path)? {
            fs::remove_dir(&path).map_err(WorkspaceError::io(&path))?;
        } else {
            empty = false;
        }
    }
    Ok(empty && dir != root)
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tree_matches_set_after_write() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("src");
        fs::create_dir_all(root.join("old")).unwrap();
        fs::write(root.join("Stale.sol"), "contract Stale {}").unwrap();
        fs::write(root.join("old/Gone.sol"), "contract Gone {}").unwrap();
        fs::write(root.join("Keep.sol.lectern-hidden"), "x").unwrap();

        let report = write_files(
            &root,
            [
                ("Counter.sol", "contract Counter {}"),
                ("utils/Math.sol", "library Math {}"),
            ],
        )
        .unwrap();

        assert_eq!(read_tree(&root).unwrap(), ["Counter.sol", "utils/Math.sol"]);
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.removed.len(), 3);
        assert!(!root.join("old").exists());
    }

    #[test]
    fn unchanged_files_are_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        write_files(dir.path(), [("A.sol", "contract A {}")]).unwrap();
        let report = write_files(dir.path(), [("A.sol", "contract A {}")]).unwrap();
        assert!(report.written.is_empty());
        assert!(report.removed.is_empty());
    }

    #[test]
    fn bad_path_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Existing.sol"), "contract E {}").unwrap();

        let err = write_files(
            dir.path(),
            [("Good.sol", "contract G {}"), ("../Evil.sol", "contract X {}")],
        )
        .unwrap_err();

        assert!(matches!(err, WorkspaceError::PathTraversal { .. }));
        assert_eq!(read_tree(dir.path()).unwrap(), ["Existing.sol"]);
        assert!(!dir.path().parent().unwrap().join("Evil.sol").exists());
    }

    #[test]
    fn empty_set_clears_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.sol"), "").unwrap();
        write_files(dir.path(), std::iter::empty()).unwrap();
        assert!(read_tree(dir.path()).unwrap().is_empty());
        assert!(dir.path().is_dir());
    }

    #[test]
    fn missing_root_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_tree(&dir.path().join("nope")).unwrap().is_empty());
    }
}
