//! Compilation result repository. Rows are append-only.

use chrono::Utc;

use lec_core::entities::{CompilationResult, Diagnostic};
use lec_core::ids::PREFIX_COMPILATION;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_i32, get_u32, parse_datetime, parse_json, to_json};
use crate::service::LecternService;

const COLUMNS: &str = "id, progress_id, success, errors, warnings, error_count, warning_count, exit_code, created_at";

#[derive(Debug, Clone)]
pub struct NewCompilation<'a> {
    pub success: bool,
    pub errors: &'a [Diagnostic],
    pub warnings: &'a [Diagnostic],
    pub exit_code: Option<i32>,
}

fn row_to_compilation(row: &libsql::Row) -> Result<CompilationResult, DatabaseError> {
    Ok(CompilationResult {
        id: row.get::<String>(0)?,
        progress_id: row.get::<String>(1)?,
        success: get_bool(row, 2)?,
        errors: parse_json(&row.get::<String>(3)?)?,
        warnings: parse_json(&row.get::<String>(4)?)?,
        error_count: get_u32(row, 5)?,
        warning_count: get_u32(row, 6)?,
        exit_code: get_opt_i32(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

fn count(items: &[Diagnostic]) -> u32 {
    u32::try_from(items.len()).unwrap_or(u32::MAX)
}

impl LecternService {
    /// # Errors
    ///
    /// Returns `DatabaseError` on query or serialization failure.
    pub async fn append_compilation_result(
        &self,
        progress_id: &str,
        result: &NewCompilation<'_>,
    ) -> Result<CompilationResult, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COMPILATION).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO compilation_results (id, progress_id, success, errors, warnings, error_count, warning_count, exit_code, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                libsql::params![
                    id.as_str(),
                    progress_id,
                    i64::from(result.success),
                    to_json(result.errors)?,
                    to_json(result.warnings)?,
                    i64::from(count(result.errors)),
                    i64::from(count(result.warnings)),
                    result.exit_code.map(i64::from),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(CompilationResult {
            id,
            progress_id: progress_id.to_string(),
            success: result.success,
            errors: result.errors.to_vec(),
            warnings: result.warnings.to_vec(),
            error_count: count(result.errors),
            warning_count: count(result.warnings),
            exit_code: result.exit_code,
            created_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn latest_compilation_result(
        &self,
        progress_id: &str,
    ) -> Result<Option<CompilationResult>, DatabaseError> {
        Ok(self
            .compilation_history(progress_id, 1)
            .await?
            .into_iter()
            .next())
    }

    /// Most recent first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn compilation_history(
        &self,
        progress_id: &str,
        limit: u32,
    ) -> Result<Vec<CompilationResult>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COLUMNS} FROM compilation_results WHERE progress_id = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT ?2"
                ),
                libsql::params![progress_id, i64::from(limit)],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_compilation(&row)?);
        }
        Ok(results)
    }
}
