//! Starting a lesson over.

use lec_core::enums::WorkspaceMode;
use lec_core::keys::ProgressKey;
use lec_core::responses::ResetResponse;
use lec_db::PersistedFiles;
use lec_workspace::workspace_root;

use crate::error::RunnerError;
use crate::runner::Runner;

impl Runner {
    /// Delete the lesson's progress, files, and results, and wipe the
    /// workspace's sources and build output. The manifest and template
    /// scaffolding stay.
    ///
    /// # Errors
    ///
    /// `Database` or `Workspace` on failure.
    pub async fn reset(&self, key: &ProgressKey) -> Result<ResetResponse, RunnerError> {
        let workspace_key = key.workspace();
        let _lock = self
            .locks()
            .workspace(&self.config().workspace, &workspace_key)
            .await?;

        let progress_deleted = self.service().delete_progress(key).await?;

        let workspace_reset = workspace_root(&self.config().workspace, &workspace_key).is_dir();
        if workspace_reset {
            self.prepare_workspace(
                &workspace_key,
                WorkspaceMode::Reset,
                None,
                &PersistedFiles::default(),
            )
            .await?;
        }

        tracing::info!(progress = %key, progress_deleted, workspace_reset, "lesson reset");
        Ok(ResetResponse {
            progress_deleted,
            workspace_reset,
        })
    }
}
