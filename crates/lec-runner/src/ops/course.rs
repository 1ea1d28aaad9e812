//! Course-level operations.

use lec_core::keys::is_safe_segment;
use lec_workspace::{BootstrapOutcome, WorkspaceError, ensure_shared_library};

use crate::error::RunnerError;
use crate::runner::Runner;

impl Runner {
    /// Populate the course's shared dependency library if it is empty.
    ///
    /// # Errors
    ///
    /// `PathTraversal` for an unsafe course id, `DependencyBootstrap` when
    /// no configured source provides a dependency.
    pub async fn bootstrap(&self, course_id: &str) -> Result<BootstrapOutcome, RunnerError> {
        if !is_safe_segment(course_id) {
            return Err(WorkspaceError::PathTraversal {
                path: course_id.to_string(),
            }
            .into());
        }
        let _lock = self.locks().course(&self.config().workspace, course_id).await?;
        let outcome = ensure_shared_library(&self.config().workspace, course_id)?;
        tracing::info!(course_id, ?outcome, "shared library ready");
        Ok(outcome)
    }
}
