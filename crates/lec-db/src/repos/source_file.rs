//! Source file repository: the authoritative "current files" of a lesson.

use chrono::Utc;

use lec_core::entities::SourceFile;
use lec_core::enums::FileType;
use lec_core::ids::PREFIX_SOURCE_FILE;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, parse_datetime, parse_enum};
use crate::service::LecternService;

const COLUMNS: &str =
    "id, progress_id, file_name, file_path, content, file_type, is_main, created_at, updated_at";

/// Fields supplied when saving a file.
#[derive(Debug, Clone)]
pub struct NewSourceFile<'a> {
    pub file_name: &'a str,
    pub file_path: &'a str,
    pub content: &'a str,
    pub file_type: FileType,
    pub is_main: bool,
}

/// A lesson's stored files, split by workspace directory.
#[derive(Debug, Clone, Default)]
pub struct PersistedFiles {
    /// Files under `src/`, main file first.
    pub sources: Vec<SourceFile>,
    /// Student-authored files under `test/`.
    pub tests: Vec<SourceFile>,
}

impl PersistedFiles {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.tests.is_empty()
    }

    /// The flagged main file, else the first contract.
    #[must_use]
    pub fn main_file(&self) -> Option<&SourceFile> {
        self.sources
            .iter()
            .find(|f| f.is_main)
            .or_else(|| {
                self.sources
                    .iter()
                    .find(|f| f.file_type == FileType::Contract)
            })
    }
}

fn row_to_source_file(row: &libsql::Row) -> Result<SourceFile, DatabaseError> {
    Ok(SourceFile {
        id: row.get::<String>(0)?,
        progress_id: row.get::<String>(1)?,
        file_name: row.get::<String>(2)?,
        file_path: row.get::<String>(3)?,
        content: row.get::<String>(4)?,
        file_type: parse_enum(&row.get::<String>(5)?)?,
        is_main: get_bool(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl LecternService {
    /// Insert or replace a file by `(progress_id, file_name)`.
    ///
    /// Saving a main file clears the flag on every other file of the lesson.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn upsert_source_file(
        &self,
        progress_id: &str,
        file: &NewSourceFile<'_>,
    ) -> Result<SourceFile, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_SOURCE_FILE).await?;

        if file.is_main {
            self.db()
                .conn()
                .execute(
                    "UPDATE source_files SET is_main = 0 WHERE progress_id = ?1 AND file_name != ?2",
                    libsql::params![progress_id, file.file_name],
                )
                .await?;
        }

        self.db()
            .conn()
            .execute(
                "INSERT INTO source_files (id, progress_id, file_name, file_path, content, file_type, is_main, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                 ON CONFLICT (progress_id, file_name) DO UPDATE SET
                     file_path = excluded.file_path,
                     content = excluded.content,
                     file_type = excluded.file_type,
                     is_main = excluded.is_main,
                     updated_at = excluded.updated_at",
                libsql::params![
                    id.as_str(),
                    progress_id,
                    file.file_name,
                    file.file_path,
                    file.content,
                    file.file_type.as_str(),
                    i64::from(file.is_main),
                    now.as_str()
                ],
            )
            .await?;

        self.get_source_file(progress_id, file.file_name)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn get_source_file(
        &self,
        progress_id: &str,
        file_name: &str,
    ) -> Result<Option<SourceFile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {COLUMNS} FROM source_files WHERE progress_id = ?1 AND file_name = ?2"),
                libsql::params![progress_id, file_name],
            )
            .await?;
        rows.next()
            .await?
            .map(|row| row_to_source_file(&row))
            .transpose()
    }

    /// All files of a lesson, main file first, then by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn list_source_files(
        &self,
        progress_id: &str,
    ) -> Result<Vec<SourceFile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COLUMNS} FROM source_files WHERE progress_id = ?1
                     ORDER BY is_main DESC, file_name"
                ),
                [progress_id],
            )
            .await?;
        let mut files = Vec::new();
        while let Some(row) = rows.next().await? {
            files.push(row_to_source_file(&row)?);
        }
        Ok(files)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn get_main_source_file(
        &self,
        progress_id: &str,
    ) -> Result<Option<SourceFile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COLUMNS} FROM source_files WHERE progress_id = ?1 AND is_main = 1 LIMIT 1"
                ),
                [progress_id],
            )
            .await?;
        rows.next()
            .await?
            .map(|row| row_to_source_file(&row))
            .transpose()
    }

    /// Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn delete_source_file(
        &self,
        progress_id: &str,
        file_name: &str,
    ) -> Result<bool, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute(
                "DELETE FROM source_files WHERE progress_id = ?1 AND file_name = ?2",
                libsql::params![progress_id, file_name],
            )
            .await?;
        Ok(deleted > 0)
    }

    /// The storage-side file set a workspace is rebuilt from.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn read_persisted_files(
        &self,
        progress_id: &str,
    ) -> Result<PersistedFiles, DatabaseError> {
        let (tests, sources) = self
            .list_source_files(progress_id)
            .await?
            .into_iter()
            .partition(|f| f.file_type == FileType::Test);
        Ok(PersistedFiles { sources, tests })
    }
}
