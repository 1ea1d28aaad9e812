//! Invocation tests against a shell script standing in for `forge`.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lec_config::ToolchainConfig;
use lec_toolchain::{Toolchain, ToolchainError, invoke, normalize, parse_test_report};
use pretty_assertions::assert_eq;

fn script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-forge");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn captures_streams_and_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let bin = script(dir.path(), r#"echo "args: $*"; echo "oops" >&2; exit 3"#);

    let inv = invoke(
        bin.to_str().unwrap(),
        dir.path(),
        &["build".into(), "--json".into()],
        Duration::from_secs(10),
    )
    .await
    .unwrap();

    assert_eq!(inv.exit_code, Some(3));
    assert_eq!(inv.stdout.trim(), "args: build --json");
    assert_eq!(inv.stderr.trim(), "oops");
}

#[tokio::test]
async fn large_output_on_both_streams_does_not_deadlock() {
    let dir = tempfile::tempdir().unwrap();
    let bin = script(
        dir.path(),
        "i=0; while [ $i -lt 5000 ]; do echo \"line $i\"; echo \"err $i\" >&2; i=$((i+1)); done",
    );

    let inv = invoke(bin.to_str().unwrap(), dir.path(), &[], Duration::from_secs(20))
        .await
        .unwrap();
    assert!(inv.succeeded());
    assert_eq!(inv.stdout.lines().count(), 5000);
    assert_eq!(inv.stderr.lines().count(), 5000);
}

#[tokio::test]
async fn timeout_kills_the_child() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("finished");
    let bin = script(
        dir.path(),
        &format!("sleep 3; touch {}", marker.display()),
    );

    let err = invoke(bin.to_str().unwrap(), dir.path(), &[], Duration::from_millis(200))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolchainError::Timeout { .. }));

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(!marker.exists(), "child kept running after timeout");
}

#[tokio::test]
async fn configured_toolchain_builds_and_tests() {
    let dir = tempfile::tempdir().unwrap();
    let bin = script(
        dir.path(),
        r#"if [ "$1" = "build" ]; then
  printf '%s\n' '{"errors":[{"severity":"warning","message":"Unused.","formattedMessage":"Warning: Unused.\n --> src/A.sol:2:3:\n"}]}'
else
  printf '%s\n' '{"test/Eval.t.sol:EvalTest":{"test_results":{"test_ok()":{"status":"Success","reason":null,"kind":{"Unit":{"gas":100}}}}}}'
fi"#,
    );
    let toolchain = Toolchain::new(ToolchainConfig {
        binary: bin.display().to_string(),
        ..ToolchainConfig::default()
    });

    let build = toolchain.build(dir.path()).await.unwrap();
    let outcome = normalize(&build.stdout, &build.stderr, Some(dir.path()))
        .into_outcome(build.exit_code);
    assert!(outcome.success);
    assert_eq!(outcome.warnings[0].location().as_deref(), Some("src/A.sol:2:3"));

    let run = toolchain.test(dir.path(), "test/Eval.t.sol").await.unwrap();
    let report = parse_test_report(&run.stdout, &run.stderr, run.exit_code);
    assert_eq!(report.summary.passed, 1);
    assert_eq!(report.tests[0].gas, Some(100));
}
