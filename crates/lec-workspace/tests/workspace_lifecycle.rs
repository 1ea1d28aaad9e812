//! End-to-end: materialize, sync from a stored set, hide around a run, re-sync.

use std::fs;

use lec_config::WorkspaceConfig;
use lec_core::keys::WorkspaceKey;
use lec_workspace::sync::{read_tree, write_files};
use lec_workspace::{HiddenFiles, WorkspaceError, WorkspaceOptions, ensure_workspace};
use pretty_assertions::assert_eq;

fn config(tmp: &std::path::Path) -> WorkspaceConfig {
    let fallback = tmp.join("fallback/forge-std/src");
    fs::create_dir_all(&fallback).unwrap();
    fs::write(fallback.join("Test.sol"), "// forge-std").unwrap();
    WorkspaceConfig {
        root: tmp.join("ws").display().to_string(),
        fallback_library_path: tmp.join("fallback").display().to_string(),
        ..Default::default()
    }
}

#[test]
fn resync_prunes_leftovers_from_interrupted_run() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let key = WorkspaceKey::new("course-1", "student-1").unwrap();
    let ws = ensure_workspace(&config, &key, &WorkspaceOptions::default()).unwrap();

    write_files(&ws.src_dir(), [("Counter.sol", "contract Counter {}")]).unwrap();
    write_files(&ws.test_dir(), [("Mine.t.sol", "contract MineTest {}")]).unwrap();

    // Simulate a run killed between hide and restore.
    let guard = HiddenFiles::hide(&ws.test_dir(), &[]).unwrap();
    std::mem::forget(guard);
    fs::write(ws.test_dir().join("Eval.t.sol"), "contract EvalTest {}").unwrap();
    assert_eq!(
        read_tree(&ws.test_dir()).unwrap(),
        ["Eval.t.sol", "Mine.t.sol.lectern-hidden"]
    );

    write_files(&ws.test_dir(), [("Mine.t.sol", "contract MineTest {}")]).unwrap();
    assert_eq!(read_tree(&ws.test_dir()).unwrap(), ["Mine.t.sol"]);
    assert_eq!(read_tree(&ws.src_dir()).unwrap(), ["Counter.sol"]);
}

#[test]
fn traversal_through_workspace_handle_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path());
    let key = WorkspaceKey::new("course-1", "student-2").unwrap();
    let ws = ensure_workspace(&config, &key, &WorkspaceOptions::default()).unwrap();

    assert!(matches!(
        ws.resolve("../student-1/src/Counter.sol"),
        Err(WorkspaceError::PathTraversal { .. })
    ));
    assert!(ws.resolve("src/Counter.sol").is_ok());
}
