//! Compiling a lesson's saved files.

use lec_core::entities::Diagnostic;
use lec_core::enums::{Severity, WorkspaceMode};
use lec_core::keys::ProgressKey;
use lec_core::lesson::LessonCode;
use lec_core::responses::CompileResponse;
use lec_db::NewCompilation;
use lec_workspace::{HiddenFiles, Workspace};

use crate::error::RunnerError;
use crate::runner::{Runner, compile_response};

const NO_CODE_MESSAGE: &str = "no source files saved for this lesson";

impl Runner {
    /// Rebuild the workspace from storage and compile the lesson's sources.
    /// Student test files are hidden for the build.
    ///
    /// Compiler errors are part of the response, not an `Err`. Every
    /// completed build is recorded.
    ///
    /// # Errors
    ///
    /// `Toolchain` on spawn failure or timeout, `Workspace` on bootstrap or
    /// filesystem failure, `Database` on storage failure.
    pub async fn compile(
        &self,
        key: &ProgressKey,
        lesson: &LessonCode,
    ) -> Result<CompileResponse, RunnerError> {
        let workspace_key = key.workspace();
        let _lock = self
            .locks()
            .workspace(&self.config().workspace, &workspace_key)
            .await?;

        let progress = self.service().upsert_progress(key).await?;
        let files = self.load_or_seed(&progress.id, lesson).await?;
        if files.sources.is_empty() {
            tracing::info!(progress = %key, "nothing to compile");
            return Ok(CompileResponse::rejected(Diagnostic::new(
                Severity::Error,
                NO_CODE_MESSAGE,
            )));
        }

        let workspace = self
            .prepare_workspace(
                &workspace_key,
                WorkspaceMode::Reuse,
                lesson.template_id.as_deref(),
                &files,
            )
            .await?;
        let response = self.build_sources(&workspace, &progress.id).await?;

        tracing::info!(
            progress = %key,
            success = response.success,
            errors = response.errors.len(),
            warnings = response.warnings.len(),
            "compiled"
        );
        Ok(response)
    }

    /// Build with every file under `test/` hidden and record the outcome.
    pub(crate) async fn build_sources(
        &self,
        workspace: &Workspace,
        progress_id: &str,
    ) -> Result<CompileResponse, RunnerError> {
        let hidden = HiddenFiles::hide(&workspace.test_dir(), &[])?;
        let invocation = self.toolchain().build(workspace.root()).await?;
        hidden.restore();

        let response = compile_response(&invocation, workspace.root());
        self.record_compilation(progress_id, &response, invocation.exit_code)
            .await?;
        Ok(response)
    }

    async fn record_compilation(
        &self,
        progress_id: &str,
        response: &CompileResponse,
        exit_code: Option<i32>,
    ) -> Result<(), RunnerError> {
        self.service()
            .append_compilation_result(
                progress_id,
                &NewCompilation {
                    success: response.success,
                    errors: &response.errors,
                    warnings: &response.warnings,
                    exit_code,
                },
            )
            .await?;
        Ok(())
    }
}
