//! Test result repository. Rows are append-only.

use chrono::Utc;

use lec_core::entities::{Diagnostic, TestCase, TestResult, TestSummary};
use lec_core::enums::TestRunStatus;
use lec_core::ids::PREFIX_TEST_RESULT;

use crate::error::DatabaseError;
use crate::helpers::{
    get_bool, get_opt_string, get_u32, parse_datetime, parse_enum, parse_json, to_json,
};
use crate::service::LecternService;

const COLUMNS: &str = "id, progress_id, success, status, test_file_name, contract_name, tests, total, passed, failed, errors, created_at";

#[derive(Debug, Clone)]
pub struct NewTestResult<'a> {
    pub success: bool,
    pub status: TestRunStatus,
    pub test_file_name: &'a str,
    pub contract_name: Option<&'a str>,
    pub tests: &'a [TestCase],
    pub summary: TestSummary,
    pub errors: &'a [Diagnostic],
}

fn row_to_test_result(row: &libsql::Row) -> Result<TestResult, DatabaseError> {
    Ok(TestResult {
        id: row.get::<String>(0)?,
        progress_id: row.get::<String>(1)?,
        success: get_bool(row, 2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        test_file_name: row.get::<String>(4)?,
        contract_name: get_opt_string(row, 5)?,
        tests: parse_json(&row.get::<String>(6)?)?,
        summary: TestSummary {
            total: get_u32(row, 7)?,
            passed: get_u32(row, 8)?,
            failed: get_u32(row, 9)?,
        },
        errors: parse_json(&row.get::<String>(10)?)?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
    })
}

impl LecternService {
    /// # Errors
    ///
    /// Returns `DatabaseError` on query or serialization failure.
    pub async fn append_test_result(
        &self,
        progress_id: &str,
        result: &NewTestResult<'_>,
    ) -> Result<TestResult, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_TEST_RESULT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO test_results (id, progress_id, success, status, test_file_name, contract_name, tests, total, passed, failed, errors, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                libsql::params![
                    id.as_str(),
                    progress_id,
                    i64::from(result.success),
                    result.status.as_str(),
                    result.test_file_name,
                    result.contract_name,
                    to_json(result.tests)?,
                    i64::from(result.summary.total),
                    i64::from(result.summary.passed),
                    i64::from(result.summary.failed),
                    to_json(result.errors)?,
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::debug!(
            progress_id,
            status = %result.status,
            passed = result.summary.passed,
            failed = result.summary.failed,
            "test result stored"
        );

        Ok(TestResult {
            id,
            progress_id: progress_id.to_string(),
            success: result.success,
            status: result.status,
            test_file_name: result.test_file_name.to_string(),
            contract_name: result.contract_name.map(String::from),
            tests: result.tests.to_vec(),
            summary: result.summary,
            errors: result.errors.to_vec(),
            created_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn latest_test_result(
        &self,
        progress_id: &str,
    ) -> Result<Option<TestResult>, DatabaseError> {
        Ok(self.test_history(progress_id, 1).await?.into_iter().next())
    }

    /// Most recent first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on query failure.
    pub async fn test_history(
        &self,
        progress_id: &str,
        limit: u32,
    ) -> Result<Vec<TestResult>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COLUMNS} FROM test_results WHERE progress_id = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT ?2"
                ),
                libsql::params![progress_id, i64::from(limit)],
            )
            .await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(row_to_test_result(&row)?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::service_with_progress;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(TestRunStatus::Completed)]
    #[case(TestRunStatus::CompilationFailed)]
    #[case(TestRunStatus::TestCompilationFailed)]
    #[case(TestRunStatus::NoContractName)]
    #[case(TestRunStatus::NoCodeFound)]
    #[tokio::test]
    async fn every_status_is_storable(#[case] status: TestRunStatus) {
        let (svc, progress) = service_with_progress().await;
        svc.append_test_result(
            &progress.id,
            &NewTestResult {
                success: false,
                status,
                test_file_name: "Eval.t.sol",
                contract_name: None,
                tests: &[],
                summary: TestSummary::default(),
                errors: &[],
            },
        )
        .await
        .unwrap();

        let latest = svc.latest_test_result(&progress.id).await.unwrap().unwrap();
        assert_eq!(latest.status, status);
        assert_eq!(latest.contract_name, None);
    }

    #[tokio::test]
    async fn stores_cases_and_summary() {
        let (svc, progress) = service_with_progress().await;
        let mut passed = TestCase::passed("test_Increment()");
        passed.gas = Some(31303);
        let tests = vec![passed, TestCase::failed("test_Decrement()", None)];
        let summary = TestSummary::from_cases(&tests);

        let stored = svc
            .append_test_result(
                &progress.id,
                &NewTestResult {
                    success: false,
                    status: TestRunStatus::Completed,
                    test_file_name: "CounterEval.t.sol",
                    contract_name: Some("Counter"),
                    tests: &tests,
                    summary,
                    errors: &[],
                },
            )
            .await
            .unwrap();
        assert!(stored.id.starts_with("tst-"));

        let history = svc.test_history(&progress.id, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].tests, tests);
        assert_eq!(history[0].summary.failed, 1);
        assert_eq!(history[0].contract_name.as_deref(), Some("Counter"));
    }
}
