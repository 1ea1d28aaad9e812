//! Test run output.
//!
//! `forge test --json` prints one object keyed by suite:
//!
//! ```json
//! {"test/Counter.t.sol:CounterTest": {"test_results": {
//!     "test_Increment()": {"status": "Success", "reason": null, "kind": {"Unit": {"gas": 31303}}}
//! }}}
//! ```
//!
//! When that is missing the human-readable `[PASS]`/`[FAIL]` lines and suite
//! summaries are used instead. The exit code always has the last word: a
//! failing exit with no failed test adds a synthesized failure.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use lec_core::entities::{TestCase, TestSummary};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::json;

/// Name of the entry added when the exit code reports a failure that the
/// output did not.
pub const SYNTHESIZED_TEST_NAME: &str = "test run";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSource {
    Structured,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub tests: Vec<TestCase>,
    pub summary: TestSummary,
    pub source: ReportSource,
}

#[derive(Debug, Deserialize)]
struct Suite {
    test_results: BTreeMap<String, RawTest>,
}

#[derive(Debug, Deserialize)]
struct RawTest {
    status: String,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    kind: Option<Value>,
}

static CASE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    // The reason may itself contain brackets; it ends at the last `]` that
    // is followed by a test signature.
    Regex::new(r"^\s*\[(PASS|FAIL)(.*)\]\s+([A-Za-z_$][A-Za-z0-9_$]*\([^)]*\))")
        .expect("valid regex")
});

static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Test|Suite) result:\s*(?:ok|FAILED)\.\s*(\d+) passed;\s*(\d+) failed")
        .expect("valid regex")
});

/// Build the report for one test invocation.
#[must_use]
pub fn parse_test_report(stdout: &str, stderr: &str, exit_code: Option<i32>) -> TestReport {
    let mut report = parse_structured(stdout).unwrap_or_else(|| parse_text(stdout, stderr));

    let failed_exit = exit_code != Some(0);
    if failed_exit && report.summary.failed == 0 {
        let reason = stderr
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map_or_else(
                || match exit_code {
                    Some(code) => format!("test run exited with status {code}"),
                    None => "test run was terminated by a signal".to_string(),
                },
                str::to_string,
            );
        report
            .tests
            .push(TestCase::failed(SYNTHESIZED_TEST_NAME, Some(reason)));
        report.summary.total += 1;
        report.summary.failed += 1;
    }

    tracing::debug!(
        source = ?report.source,
        total = report.summary.total,
        failed = report.summary.failed,
        "parsed test report"
    );
    report
}

fn parse_structured(stdout: &str) -> Option<TestReport> {
    let suites: BTreeMap<String, Suite> = json::extract(stdout)?;

    let mut tests = Vec::new();
    for (suite_name, suite) in suites {
        for (name, raw) in suite.test_results {
            let mut case = if raw.status == "Success" {
                TestCase::passed(name)
            } else {
                TestCase::failed(name, raw.reason)
            };
            case.suite = Some(suite_name.clone());
            case.gas = raw.kind.as_ref().and_then(gas_of);
            tests.push(case);
        }
    }

    Some(TestReport {
        summary: TestSummary::from_cases(&tests),
        tests,
        source: ReportSource::Structured,
    })
}

fn gas_of(kind: &Value) -> Option<u64> {
    kind.pointer("/Unit/gas")
        .or_else(|| kind.pointer("/Fuzz/mean_gas"))
        .and_then(Value::as_u64)
}

fn parse_text(stdout: &str, stderr: &str) -> TestReport {
    let mut tests = Vec::new();
    let mut counted = TestSummary::default();

    for line in stdout.lines().chain(stderr.lines()) {
        if let Some(caps) = CASE_LINE.captures(line) {
            let name = caps[3].to_string();
            tests.push(if &caps[1] == "PASS" {
                TestCase::passed(name)
            } else {
                TestCase::failed(name, failure_reason(&caps[2]))
            });
        } else if let Some(caps) = SUMMARY_LINE.captures(line) {
            let passed: u32 = caps[1].parse().unwrap_or(0);
            let failed: u32 = caps[2].parse().unwrap_or(0);
            counted.passed += passed;
            counted.failed += failed;
            counted.total += passed + failed;
        }
    }

    // Per-test lines are more precise than summaries when both are present.
    let summary = if tests.is_empty() {
        counted
    } else {
        TestSummary::from_cases(&tests)
    };
    TestReport {
        tests,
        summary,
        source: ReportSource::Text,
    }
}

/// `": assertion failed"` or `". Reason: revert: nope"` → the bare reason.
fn failure_reason(bracket_tail: &str) -> Option<String> {
    let tail = bracket_tail.trim_start_matches(['.', ':', ' ']);
    let tail = tail.strip_prefix("Reason:").unwrap_or(tail).trim();
    (!tail.is_empty()).then(|| tail.to_string())
}
