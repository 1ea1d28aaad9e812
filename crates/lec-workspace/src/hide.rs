//! Temporarily move competing source files out of the toolchain's view.
//!
//! The toolchain compiles every `.sol` file under a directory. To build
//! without student tests, or to run a single evaluator test, the other files
//! are renamed with [`HIDDEN_SUFFIX`] and renamed back afterwards.
//!
//! [`HiddenFiles`] restores on drop, so an early return, a timeout, or a
//! panic unwinding through the caller still puts the files back.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;
use crate::sync::read_tree;

pub const HIDDEN_SUFFIX: &str = ".lectern-hidden";

/// Guard over a set of renamed files.
#[derive(Debug)]
#[must_use = "dropping the guard immediately restores the hidden files"]
pub struct HiddenFiles {
    /// `(original, hidden)` pairs in the order they were moved.
    moved: Vec<(PathBuf, PathBuf)>,
}

impl HiddenFiles {
    /// Hide every `.sol` file under `dir` whose relative path is not in `keep`.
    ///
    /// If a rename fails part way, the files already moved are put back
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::Io` or `WorkspaceError::Walk`.
    pub fn hide(dir: &Path, keep: &[&str]) -> Result<Self, WorkspaceError> {
        let keep: HashSet<&str> = keep.iter().copied().collect();
        let mut guard = Self { moved: Vec::new() };

        for rel in read_tree(dir)? {
            if keep.contains(rel.as_str()) || !is_source(&rel) {
                continue;
            }
            let original = dir.join(&rel);
            let hidden = hidden_path(&original);
            fs::rename(&original, &hidden).map_err(WorkspaceError::io(&original))?;
            guard.moved.push((original, hidden));
        }

        tracing::debug!(dir = %dir.display(), hidden = guard.moved.len(), "hid files");
        Ok(guard)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moved.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moved.is_empty()
    }

    /// Put every file back. Returns how many were restored; failures are
    /// logged and skipped.
    pub fn restore(mut self) -> usize {
        self.restore_all()
    }

    fn restore_all(&mut self) -> usize {
        let mut restored = 0;
        for (original, hidden) in self.moved.drain(..).rev() {
            match fs::rename(&hidden, &original) {
                Ok(()) => restored += 1,
                Err(e) => tracing::warn!(
                    file = %original.display(),
                    error = %e,
                    "failed to restore hidden file"
                ),
            }
        }
        restored
    }
}

impl Drop for HiddenFiles {
    fn drop(&mut self) {
        if !self.moved.is_empty() {
            self.restore_all();
        }
    }
}

fn is_source(rel: &str) -> bool {
    Path::new(rel)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sol"))
}

fn hidden_path(original: &Path) -> PathBuf {
    let mut name: OsString = original.as_os_str().to_owned();
    name.push(HIDDEN_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.t.sol"), "a").unwrap();
        fs::write(dir.path().join("B.t.sol"), "b").unwrap();
        fs::write(dir.path().join("Eval.t.sol"), "e").unwrap();
        fs::write(dir.path().join("notes.md"), "n").unwrap();
        dir
    }

    #[test]
    fn hides_all_but_kept_and_restores() {
        let dir = fixture();
        let guard = HiddenFiles::hide(dir.path(), &["Eval.t.sol"]).unwrap();
        assert_eq!(guard.len(), 2);
        assert_eq!(
            read_tree(dir.path()).unwrap(),
            [
                "A.t.sol.lectern-hidden",
                "B.t.sol.lectern-hidden",
                "Eval.t.sol",
                "notes.md"
            ]
        );

        assert_eq!(guard.restore(), 2);
        assert_eq!(
            read_tree(dir.path()).unwrap(),
            ["A.t.sol", "B.t.sol", "Eval.t.sol", "notes.md"]
        );
    }

    #[test]
    fn drop_restores() {
        let dir = fixture();
        {
            let _guard = HiddenFiles::hide(dir.path(), &[]).unwrap();
            assert!(!dir.path().join("A.t.sol").exists());
        }
        assert!(dir.path().join("A.t.sol").exists());
        assert!(dir.path().join("Eval.t.sol").exists());
        assert!(
            read_tree(dir.path())
                .unwrap()
                .iter()
                .all(|p| !p.ends_with(HIDDEN_SUFFIX))
        );
    }

    #[test]
    fn restores_during_unwind() {
        let dir = fixture();
        let path = dir.path().to_path_buf();
        let result = std::panic::catch_unwind(move || {
            let _guard = HiddenFiles::hide(&path, &[]).unwrap();
            panic!("toolchain blew up");
        });
        assert!(result.is_err());
        assert!(dir.path().join("B.t.sol").exists());
    }

    #[test]
    fn missing_file_on_restore_is_swallowed() {
        let dir = fixture();
        let guard = HiddenFiles::hide(dir.path(), &[]).unwrap();
        fs::remove_file(dir.path().join("A.t.sol.lectern-hidden")).unwrap();
        assert_eq!(guard.restore(), 2);
    }

    #[test]
    fn missing_directory_hides_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let guard = HiddenFiles::hide(&dir.path().join("test"), &[]).unwrap();
        assert!(guard.is_empty());
    }
}
