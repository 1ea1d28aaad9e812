use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("path escapes workspace root: {path}")]
    PathTraversal { path: String },

    #[error("could not bootstrap shared dependencies for course '{course_id}': {reason}")]
    DependencyBootstrap { course_id: String, reason: String },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("failed to render project manifest: {0}")]
    Manifest(#[from] toml::ser::Error),
}

impl WorkspaceError {
    pub(crate) fn traversal(path: impl Into<String>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Adapter for `map_err` on filesystem calls.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
