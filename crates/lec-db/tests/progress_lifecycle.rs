//! Progress lifecycle across all repos: save, results, status, reset.

use lec_core::entities::{Diagnostic, TestCase, TestSummary};
use lec_core::enums::{FileType, Severity, TestRunStatus};
use lec_core::keys::ProgressKey;
use lec_db::{LecternService, NewCompilation, NewSourceFile, NewTestResult};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn reset_cascades_to_files_and_results() {
    let svc = LecternService::new_local(":memory:").await.unwrap();
    let key = ProgressKey::new("alice", "sol-101", "counter").unwrap();
    let progress = svc.upsert_progress(&key).await.unwrap();

    svc.upsert_source_file(
        &progress.id,
        &NewSourceFile {
            file_name: "Counter.sol",
            file_path: "src/Counter.sol",
            content: "contract Counter {}",
            file_type: FileType::Contract,
            is_main: true,
        },
    )
    .await
    .unwrap();

    let warning = Diagnostic::new(Severity::Warning, "Unused variable.");
    svc.append_compilation_result(
        &progress.id,
        &NewCompilation {
            success: true,
            errors: &[],
            warnings: std::slice::from_ref(&warning),
            exit_code: Some(0),
        },
    )
    .await
    .unwrap();

    let tests = vec![TestCase::passed("test_Increment()")];
    svc.append_test_result(
        &progress.id,
        &NewTestResult {
            success: true,
            status: TestRunStatus::Completed,
            test_file_name: "CounterEval.t.sol",
            contract_name: Some("Counter"),
            tests: &tests,
            summary: TestSummary::from_cases(&tests),
            errors: &[],
        },
    )
    .await
    .unwrap();
    let completed = svc.mark_progress_completed(&progress.id).await.unwrap();
    assert!(completed.completed);

    assert!(svc.delete_progress(&key).await.unwrap());
    assert!(svc.get_progress(&key).await.unwrap().is_none());
    assert!(svc.list_source_files(&progress.id).await.unwrap().is_empty());
    assert!(
        svc.latest_compilation_result(&progress.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(svc.latest_test_result(&progress.id).await.unwrap().is_none());

    let fresh = svc.upsert_progress(&key).await.unwrap();
    assert_ne!(fresh.id, progress.id);
    assert!(!fresh.completed);
}
