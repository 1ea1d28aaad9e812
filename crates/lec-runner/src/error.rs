use std::path::PathBuf;

use lec_core::errors::CoreError;
use lec_db::error::DatabaseError;
use lec_toolchain::ToolchainError;
use lec_workspace::WorkspaceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A submission declares nothing and carries no usable `.sol` path.
    #[error("cannot name submitted file '{submitted}': no declaration found and no .sol path given")]
    UnnamedFile { submitted: String },

    #[error("lesson has no evaluator test")]
    MissingEvaluator,

    /// Another process kept the lock file for longer than the wait limit.
    #[error("{} is locked by pid {holder}; try again after it finishes", path.display())]
    Busy { path: PathBuf, holder: i32 },

    #[error("could not acquire lock at {}; remove it if no lct process is running", path.display())]
    LockUnavailable { path: PathBuf },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<CoreError> for RunnerError {
    fn from(error: CoreError) -> Self {
        // Identifiers become directory names.
        let CoreError::InvalidIdentifier { value, .. } = error;
        Self::Workspace(WorkspaceError::PathTraversal { path: value })
    }
}

impl RunnerError {
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Toolchain(ToolchainError::Timeout { .. }))
    }

    #[must_use]
    pub const fn is_path_traversal(&self) -> bool {
        matches!(self, Self::Workspace(WorkspaceError::PathTraversal { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lec_core::keys::ProgressKey;

    #[test]
    fn unsafe_identifiers_are_traversals() {
        let err: RunnerError = ProgressKey::new("../../etc", "c", "l").unwrap_err().into();
        assert!(err.is_path_traversal());
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeouts_are_recognized() {
        let err = RunnerError::from(ToolchainError::Timeout {
            binary: "forge".into(),
            after: std::time::Duration::from_secs(1),
        });
        assert!(err.is_timeout());
        assert!(!err.is_path_traversal());
    }
}
