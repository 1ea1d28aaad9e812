//! Running a lesson's evaluator test against the student's saved code.
//!
//! One request walks these steps in order, stopping early with a status when
//! a precondition fails:
//!
//! 1. resolve: load saved files (seeding from starter code) and find the
//!    main contract name
//! 2. compile gate: build with every file under `test/` hidden
//! 3. hide: place the evaluator and hide every other test file
//! 4. run: `test --match-path test/<evaluator>`
//! 5. restore: put hidden files back and delete the evaluator, even on
//!    timeout
//! 6. parse: per-test results, or the evaluator's own compile errors
//! 7. persist: append the result and mark the lesson completed on success

use lec_core::entities::Diagnostic;
use lec_core::enums::{TestRunStatus, WorkspaceMode};
use lec_core::keys::ProgressKey;
use lec_core::lesson::{EvaluatorTest, LessonCode};
use lec_core::responses::TestRunResponse;
use lec_db::NewTestResult;
use lec_parser::{SOURCE_EXTENSION, file_name_of, resolve_declared_name};
use lec_toolchain::test_report::SYNTHESIZED_TEST_NAME;
use lec_toolchain::{ReportSource, TestReport, normalize, parse_test_report};
use lec_workspace::materialize::TEST_DIR;
use lec_workspace::{HiddenFiles, TransientFile, WorkspaceError};

use crate::error::RunnerError;
use crate::runner::Runner;

impl Runner {
    /// Run the lesson's evaluator test. Every outcome that reaches the
    /// toolchain, and every early stop, is recorded.
    ///
    /// # Errors
    ///
    /// `MissingEvaluator` if the lesson has no test, `PathTraversal` for an
    /// evaluator name that is not a plain file name, `Toolchain` on spawn
    /// failure or timeout. Hidden files are restored before any error
    /// returns.
    pub async fn run_tests(
        &self,
        key: &ProgressKey,
        lesson: &LessonCode,
    ) -> Result<TestRunResponse, RunnerError> {
        let evaluator = lesson.test.as_ref().ok_or(RunnerError::MissingEvaluator)?;
        check_evaluator_name(&evaluator.test_file_name)?;

        let _lock = self
            .locks()
            .workspace(&self.config().workspace, &key.workspace())
            .await?;
        let progress = self.service().upsert_progress(key).await?;

        let response = self.run_locked(&progress.id, key, lesson, evaluator).await?;
        self.record_test_run(&progress.id, &response).await?;

        tracing::info!(
            progress = %key,
            status = %response.status,
            passed = response.summary.passed,
            failed = response.summary.failed,
            success = response.success,
            "test run finished"
        );
        Ok(response)
    }

    async fn run_locked(
        &self,
        progress_id: &str,
        key: &ProgressKey,
        lesson: &LessonCode,
        evaluator: &EvaluatorTest,
    ) -> Result<TestRunResponse, RunnerError> {
        let test_file_name = evaluator.test_file_name.as_str();

        let files = self.load_or_seed(progress_id, lesson).await?;
        if files.is_empty() {
            return Ok(TestRunResponse::stopped(
                TestRunStatus::NoCodeFound,
                test_file_name,
                None,
            ));
        }
        let Some(contract_name) = files
            .main_file()
            .and_then(|main| resolve_declared_name(&main.content))
        else {
            return Ok(TestRunResponse::stopped(
                TestRunStatus::NoContractName,
                test_file_name,
                None,
            ));
        };
        tracing::debug!(progress = %key, contract = %contract_name, "resolved main contract");

        let workspace = self
            .prepare_workspace(
                &key.workspace(),
                WorkspaceMode::Reuse,
                lesson.template_id.as_deref(),
                &files,
            )
            .await?;

        let compilation = self.build_sources(&workspace, progress_id).await?;
        if !compilation.errors.is_empty() {
            return Ok(TestRunResponse {
                compilation: Some(compilation),
                ..TestRunResponse::stopped(
                    TestRunStatus::CompilationFailed,
                    test_file_name,
                    Some(contract_name),
                )
            });
        }

        let test_path = format!("{TEST_DIR}/{test_file_name}");
        let invocation = {
            let placed =
                TransientFile::write(workspace.resolve(&test_path)?, &evaluator.test_content)?;
            let hidden = HiddenFiles::hide(&workspace.test_dir(), &[test_file_name])?;
            let result = self.toolchain().test(workspace.root(), &test_path).await;
            hidden.restore();
            drop(placed);
            result?
        };

        let report = parse_test_report(
            &invocation.stdout,
            &invocation.stderr,
            invocation.exit_code,
        );
        if report.source == ReportSource::Text && !has_reported_cases(&report) {
            let diagnostics = normalize(
                &invocation.stdout,
                &invocation.stderr,
                Some(workspace.root()),
            );
            if !diagnostics.errors.is_empty() {
                return Ok(TestRunResponse {
                    compilation: Some(compilation),
                    test_errors: diagnostics.errors,
                    ..TestRunResponse::stopped(
                        TestRunStatus::TestCompilationFailed,
                        test_file_name,
                        Some(contract_name),
                    )
                });
            }
        }

        Ok(TestRunResponse {
            success: report.summary.failed == 0 && report.summary.total > 0,
            status: TestRunStatus::Completed,
            compilation: Some(compilation),
            tests: report.tests,
            summary: report.summary,
            test_file_name: test_file_name.to_string(),
            contract_name: Some(contract_name),
            test_errors: Vec::new(),
        })
    }

    async fn record_test_run(
        &self,
        progress_id: &str,
        response: &TestRunResponse,
    ) -> Result<(), RunnerError> {
        let errors: &[Diagnostic] = match (&response.compilation, response.status) {
            (Some(compilation), TestRunStatus::CompilationFailed) => &compilation.errors,
            _ => &response.test_errors,
        };
        self.service()
            .append_test_result(
                progress_id,
                &NewTestResult {
                    success: response.success,
                    status: response.status,
                    test_file_name: &response.test_file_name,
                    contract_name: response.contract_name.as_deref(),
                    tests: &response.tests,
                    summary: response.summary,
                    errors,
                },
            )
            .await?;

        if response.success {
            self.service().mark_progress_completed(progress_id).await?;
        }
        Ok(())
    }
}

/// The evaluator lands directly in `test/`, so its name must be one plain
/// `.sol` file name.
fn check_evaluator_name(name: &str) -> Result<(), RunnerError> {
    if file_name_of(name) != Some(name) || name.starts_with('.') {
        return Err(WorkspaceError::PathTraversal {
            path: name.to_string(),
        }
        .into());
    }
    if !name.ends_with(SOURCE_EXTENSION) {
        return Err(RunnerError::InvalidInput(format!(
            "evaluator test '{name}' is not a {SOURCE_EXTENSION} file"
        )));
    }
    Ok(())
}

/// Whether the output named at least one test, as opposed to only the entry
/// synthesized from a failing exit code.
fn has_reported_cases(report: &TestReport) -> bool {
    report
        .tests
        .iter()
        .any(|case| case.name != SYNTHESIZED_TEST_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CounterEval.t.sol")]
    #[case("Eval.sol")]
    fn plain_names_accepted(#[case] name: &str) {
        check_evaluator_name(name).unwrap();
    }

    #[rstest]
    #[case("../Eval.t.sol")]
    #[case("sub/Eval.t.sol")]
    #[case("..\\Eval.t.sol")]
    #[case("..")]
    #[case("")]
    fn path_like_names_are_traversals(#[case] name: &str) {
        let err = check_evaluator_name(name).unwrap_err();
        assert!(err.is_path_traversal(), "{name:?}");
    }

    #[test]
    fn non_solidity_name_rejected() {
        let err = check_evaluator_name("eval.txt").unwrap_err();
        assert!(matches!(err, RunnerError::InvalidInput(_)));
    }

    #[test]
    fn synthesized_entry_is_not_a_reported_case() {
        let report = parse_test_report("", "Error: compilation failed", Some(1));
        assert!(!has_reported_cases(&report));

        let report = parse_test_report("[PASS] test_ok() (gas: 1)\n", "", Some(0));
        assert!(has_reported_cases(&report));
    }
}
