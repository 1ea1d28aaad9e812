//! The orchestrator shared by every request.
//!
//! Operations live in `crate::ops` as `impl Runner` blocks, one module per
//! request kind.

use std::path::Path;

use lec_config::LecternConfig;
use lec_core::entities::SourceFile;
use lec_core::enums::WorkspaceMode;
use lec_core::keys::{ProgressKey, WorkspaceKey};
use lec_core::responses::CompileResponse;
use lec_db::{LecternService, PersistedFiles};
use lec_toolchain::{Invocation, Toolchain, normalize};
use lec_workspace::{
    Workspace, WorkspaceOptions, ensure_shared_library, ensure_workspace, write_files,
};

use crate::error::RunnerError;
use crate::locks::WorkspaceLocks;

pub struct Runner {
    config: LecternConfig,
    service: LecternService,
    toolchain: Toolchain,
    locks: WorkspaceLocks,
}

impl Runner {
    #[must_use]
    pub fn new(config: LecternConfig, service: LecternService) -> Self {
        let toolchain = Toolchain::new(config.toolchain.clone());
        Self {
            config,
            service,
            toolchain,
            locks: WorkspaceLocks::new(),
        }
    }

    /// Open the configured database, creating its directory, and build a runner.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Database` if the database cannot be opened.
    pub async fn open(config: LecternConfig) -> Result<Self, RunnerError> {
        if !config.database.is_in_memory()
            && let Some(parent) = Path::new(&config.database.path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| RunnerError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let service = LecternService::new_local(&config.database.path).await?;
        Ok(Self::new(config, service))
    }

    #[must_use]
    pub const fn config(&self) -> &LecternConfig {
        &self.config
    }

    #[must_use]
    pub const fn service(&self) -> &LecternService {
        &self.service
    }

    pub(crate) const fn locks(&self) -> &WorkspaceLocks {
        &self.locks
    }

    /// Validated progress key.
    ///
    /// # Errors
    ///
    /// `PathTraversal` if an id is not a single safe path segment.
    pub fn key(
        student_id: &str,
        course_id: &str,
        lesson_id: &str,
    ) -> Result<ProgressKey, RunnerError> {
        Ok(ProgressKey::new(student_id, course_id, lesson_id)?)
    }

    pub(crate) const fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Materialize the workspace and rewrite `src/` and `test/` from storage.
    ///
    /// The caller must hold the workspace lock.
    pub(crate) async fn prepare_workspace(
        &self,
        key: &WorkspaceKey,
        mode: WorkspaceMode,
        template_id: Option<&str>,
        files: &PersistedFiles,
    ) -> Result<Workspace, RunnerError> {
        {
            let _course = self.locks.course(&self.config.workspace, &key.course_id).await?;
            ensure_shared_library(&self.config.workspace, &key.course_id)?;
        }

        let workspace = ensure_workspace(
            &self.config.workspace,
            key,
            &WorkspaceOptions {
                mode,
                template_id: template_id.map(String::from),
                library_ready: true,
            },
        )?;
        write_files(&workspace.src_dir(), as_entries(&files.sources))?;
        write_files(&workspace.test_dir(), as_entries(&files.tests))?;
        Ok(workspace)
    }
}

fn as_entries(files: &[SourceFile]) -> impl Iterator<Item = (&str, &str)> {
    files
        .iter()
        .map(|f| (f.file_name.as_str(), f.content.as_str()))
}

/// Turn a `build` invocation into the compile response shape.
pub(crate) fn compile_response(invocation: &Invocation, cwd: &Path) -> CompileResponse {
    let normalized = normalize(&invocation.stdout, &invocation.stderr, Some(cwd));
    let structured = normalized.structured;
    let outcome = normalized.into_outcome(invocation.exit_code);

    let stderr = invocation.stderr.trim();
    let stdout = invocation.stdout.trim();
    let output = if !stderr.is_empty() {
        Some(stderr.to_string())
    } else if !structured && !stdout.is_empty() {
        Some(stdout.to_string())
    } else {
        None
    };
    let raw = (!structured && !stdout.is_empty()).then(|| invocation.stdout.clone());

    CompileResponse {
        success: outcome.success,
        errors: outcome.errors,
        warnings: outcome.warnings,
        output,
        raw,
    }
}
