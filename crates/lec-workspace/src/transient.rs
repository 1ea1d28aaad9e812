//! Files that live only for the duration of one toolchain run.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;

/// A written file that is deleted when the guard drops.
#[derive(Debug)]
#[must_use = "dropping the guard immediately deletes the file"]
pub struct TransientFile {
    path: PathBuf,
}

impl TransientFile {
    /// Write `content` to `path`, creating parent directories. An existing
    /// file at `path` is overwritten.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::Io`.
    pub fn write(path: PathBuf, content: &str) -> Result<Self, WorkspaceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(WorkspaceError::io(parent))?;
        }
        fs::write(&path, content).map_err(WorkspaceError::io(&path))?;
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                file = %self.path.display(),
                error = %e,
                "failed to remove transient file"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test/Eval.t.sol");

        let file = TransientFile::write(path.clone(), "contract EvalTest {}").unwrap();
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "contract EvalTest {}");
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn already_gone_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let file = TransientFile::write(dir.path().join("x.sol"), "").unwrap();
        fs::remove_file(file.path()).unwrap();
        drop(file);
    }
}
