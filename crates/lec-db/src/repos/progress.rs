//! Student progress repository.

use chrono::Utc;

use lec_core::entities::StudentProgress;
use lec_core::ids::PREFIX_PROGRESS;
use lec_core::keys::ProgressKey;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, parse_datetime, parse_optional_datetime};
use crate::service::LecternService;

const COLUMNS: &str =
    "id, student_id, course_id, lesson_id, completed, completed_at, created_at, updated_at";

fn row_to_progress(row: &libsql::Row) -> Result<StudentProgress, DatabaseError> {
    Ok(StudentProgress {
        id: row.get::<String>(0)?,
        student_id: row.get::<String>(1)?,
        course_id: row.get::<String>(2)?,
        lesson_id: row.get::<String>(3)?,
        completed: get_bool(row, 4)?,
        completed_at: parse_optional_datetime(row.get::<Option<String>>(5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl LecternService {
    /// Get the progress row for `key`, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn upsert_progress(&self, key: &ProgressKey) -> Result<StudentProgress, DatabaseError> {
        if let Some(existing) = self.get_progress(key).await? {
            return Ok(existing);
        }

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_PROGRESS).await?;
        // Concurrent first saves race here; the unique key keeps one row.
        self.db()
            .conn()
            .execute(
                "INSERT INTO student_progress (id, student_id, course_id, lesson_id, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
                 ON CONFLICT (student_id, course_id, lesson_id) DO NOTHING",
                libsql::params![
                    id.as_str(),
                    key.student_id.as_str(),
                    key.course_id.as_str(),
                    key.lesson_id.as_str(),
                    now.as_str()
                ],
            )
            .await?;
        tracing::debug!(progress = %key, "progress created");

        self.get_progress(key).await?.ok_or(DatabaseError::NoResult)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn get_progress(
        &self,
        key: &ProgressKey,
    ) -> Result<Option<StudentProgress>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COLUMNS} FROM student_progress
                     WHERE student_id = ?1 AND course_id = ?2 AND lesson_id = ?3"
                ),
                libsql::params![
                    key.student_id.as_str(),
                    key.course_id.as_str(),
                    key.lesson_id.as_str()
                ],
            )
            .await?;
        rows.next()
            .await?
            .map(|row| row_to_progress(&row))
            .transpose()
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no row has this id.
    pub async fn get_progress_by_id(&self, id: &str) -> Result<StudentProgress, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {COLUMNS} FROM student_progress WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_progress(&row)
    }

    /// All progress rows for a student, optionally limited to one course.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn list_progress(
        &self,
        student_id: &str,
        course_id: Option<&str>,
    ) -> Result<Vec<StudentProgress>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COLUMNS} FROM student_progress
                     WHERE student_id = ?1 AND (?2 IS NULL OR course_id = ?2)
                     ORDER BY course_id, lesson_id"
                ),
                libsql::params![student_id, course_id],
            )
            .await?;
        let mut progress = Vec::new();
        while let Some(row) = rows.next().await? {
            progress.push(row_to_progress(&row)?);
        }
        Ok(progress)
    }

    /// Bump `updated_at`; called whenever files change.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn touch_progress(&self, progress_id: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE student_progress SET updated_at = ?1 WHERE id = ?2",
                libsql::params![Utc::now().to_rfc3339(), progress_id],
            )
            .await?;
        Ok(())
    }

    /// Mark a lesson completed. The first completion time is kept.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no row has this id.
    pub async fn mark_progress_completed(
        &self,
        progress_id: &str,
    ) -> Result<StudentProgress, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE student_progress
                 SET completed = 1, completed_at = COALESCE(completed_at, ?1), updated_at = ?1
                 WHERE id = ?2",
                libsql::params![now.as_str(), progress_id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        tracing::info!(progress_id, "lesson completed");
        self.get_progress_by_id(progress_id).await
    }

    /// Delete a progress row with its files and results. Returns whether a
    /// row existed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn delete_progress(&self, key: &ProgressKey) -> Result<bool, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute(
                "DELETE FROM student_progress
                 WHERE student_id = ?1 AND course_id = ?2 AND lesson_id = ?3",
                libsql::params![
                    key.student_id.as_str(),
                    key.course_id.as_str(),
                    key.lesson_id.as_str()
                ],
            )
            .await?;
        Ok(deleted > 0)
    }
}
