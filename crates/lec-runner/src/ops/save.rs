//! Saving submitted files.
//!
//! The stored name comes from the declaration in the source, not from the
//! path the caller sent, so `contract Vault {}` is always `src/Vault.sol`.

use lec_core::entities::SourceFile;
use lec_core::enums::FileType;
use lec_core::keys::ProgressKey;
use lec_core::lesson::{LessonCode, SubmittedFile};
use lec_core::responses::SaveResponse;
use lec_db::{NewSourceFile, PersistedFiles};
use lec_parser::{is_test_file, resolve_declaration, resolve_file_name};

use crate::error::RunnerError;
use crate::runner::Runner;

/// A submission with its storage name and classification settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub file_name: String,
    /// `src/<name>` or `test/<name>`.
    pub file_path: String,
    pub file_type: FileType,
    pub is_main: bool,
}

/// Name and classify a submission without storing it.
///
/// Test files are recognized by the `.t.sol` suffix of the submitted path.
///
/// # Errors
///
/// `UnnamedFile` when the source declares nothing and the path is not a
/// usable `.sol` file name.
pub fn resolve_submission(file: &SubmittedFile) -> Result<ResolvedFile, RunnerError> {
    let caller_path = file.path.as_deref();
    let is_test = caller_path.is_some_and(is_test_file);

    let file_name = resolve_file_name(&file.content, caller_path, is_test).ok_or_else(|| {
        RunnerError::UnnamedFile {
            submitted: caller_path.unwrap_or("<inline source>").to_string(),
        }
    })?;
    let file_type = FileType::classify(resolve_declaration(&file.content).map(|d| d.kind), is_test);

    Ok(ResolvedFile {
        file_path: format!("{}/{file_name}", file_type.directory()),
        file_name,
        file_type,
        is_main: file.is_main && file_type != FileType::Test,
    })
}

impl Runner {
    /// Store submitted files for a lesson, creating its progress record.
    ///
    /// # Errors
    ///
    /// `UnnamedFile` if any submission cannot be named (nothing is stored),
    /// `Database` on storage failure.
    pub async fn save(
        &self,
        key: &ProgressKey,
        files: &[SubmittedFile],
    ) -> Result<SaveResponse, RunnerError> {
        let _lock = self
            .locks()
            .workspace(&self.config().workspace, &key.workspace())
            .await?;
        let progress = self.service().upsert_progress(key).await?;
        self.store_files(&progress.id, files).await?;

        tracing::info!(progress = %key, submitted = files.len(), "files saved");
        Ok(SaveResponse {
            files: self.service().list_source_files(&progress.id).await?,
            progress: self.service().get_progress_by_id(&progress.id).await?,
        })
    }

    /// Upsert files by derived name. When a new main file arrives under a
    /// different name and the old main file was not resubmitted, the old
    /// record is removed.
    pub(crate) async fn store_files(
        &self,
        progress_id: &str,
        files: &[SubmittedFile],
    ) -> Result<Vec<SourceFile>, RunnerError> {
        let resolved = files
            .iter()
            .map(|file| resolve_submission(file).map(|r| (r, file.content.as_str())))
            .collect::<Result<Vec<_>, _>>()?;
        if resolved.is_empty() {
            return Ok(Vec::new());
        }

        let previous_main = self.service().get_main_source_file(progress_id).await?;

        let mut stored = Vec::with_capacity(resolved.len());
        for (file, content) in &resolved {
            let saved = self
                .service()
                .upsert_source_file(
                    progress_id,
                    &NewSourceFile {
                        file_name: &file.file_name,
                        file_path: &file.file_path,
                        content,
                        file_type: file.file_type,
                        is_main: file.is_main,
                    },
                )
                .await?;
            stored.push(saved);
        }

        if let Some(previous) = previous_main
            && resolved.iter().any(|(f, _)| f.is_main)
            && !resolved.iter().any(|(f, _)| f.file_name == previous.file_name)
        {
            self.service()
                .delete_source_file(progress_id, &previous.file_name)
                .await?;
            tracing::info!(
                progress_id,
                removed = %previous.file_name,
                "main file renamed, previous record removed"
            );
        }

        self.service().touch_progress(progress_id).await?;
        Ok(stored)
    }

    /// Stored files, seeded from the lesson's starter code when there are none.
    pub(crate) async fn load_or_seed(
        &self,
        progress_id: &str,
        lesson: &LessonCode,
    ) -> Result<PersistedFiles, RunnerError> {
        let files = self.service().read_persisted_files(progress_id).await?;
        if !files.is_empty() {
            return Ok(files);
        }
        let Some(initial) = lesson.initial_code.as_ref().filter(|code| !code.is_empty()) else {
            return Ok(files);
        };

        tracing::debug!(progress_id, "seeding from lesson starter code");
        self.store_files(progress_id, &initial.clone().into_submissions())
            .await?;
        Ok(self.service().read_persisted_files(progress_id).await?)
    }
}
