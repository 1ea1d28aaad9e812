//! Read-only queries over stored progress and results.

use lec_core::entities::SourceFile;
use lec_core::keys::ProgressKey;
use lec_core::responses::{HistoryResponse, StatusResponse};

use crate::error::RunnerError;
use crate::runner::Runner;

impl Runner {
    /// The lesson's saved files, main file first. Empty when nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Database` on storage failure.
    pub async fn files(&self, key: &ProgressKey) -> Result<Vec<SourceFile>, RunnerError> {
        match self.service().get_progress(key).await? {
            Some(progress) => Ok(self.service().list_source_files(&progress.id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Progress plus the most recent compile and test results.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Database` on storage failure.
    pub async fn status(&self, key: &ProgressKey) -> Result<StatusResponse, RunnerError> {
        let Some(progress) = self.service().get_progress(key).await? else {
            return Ok(StatusResponse {
                progress: None,
                latest_compilation: None,
                latest_test: None,
            });
        };
        Ok(StatusResponse {
            latest_compilation: self
                .service()
                .latest_compilation_result(&progress.id)
                .await?,
            latest_test: self.service().latest_test_result(&progress.id).await?,
            progress: Some(progress),
        })
    }

    /// Up to `limit` compile and test results each, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::Database` on storage failure.
    pub async fn history(
        &self,
        key: &ProgressKey,
        limit: u32,
    ) -> Result<HistoryResponse, RunnerError> {
        let Some(progress) = self.service().get_progress(key).await? else {
            return Ok(HistoryResponse {
                compilations: Vec::new(),
                tests: Vec::new(),
            });
        };
        Ok(HistoryResponse {
            compilations: self
                .service()
                .compilation_history(&progress.id, limit)
                .await?,
            tests: self.service().test_history(&progress.id, limit).await?,
        })
    }
}
