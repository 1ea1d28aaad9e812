use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TestStatus;

/// One test function's outcome.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    /// Suite identifier, e.g. `test/Counter.t.sol:CounterTest`.
    pub suite: Option<String>,
    pub status: TestStatus,
    /// Failure reason. Always non-empty for failed tests.
    pub reason: Option<String>,
    pub gas: Option<u64>,
}

impl TestCase {
    #[must_use]
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            suite: None,
            status: TestStatus::Passed,
            reason: None,
            gas: None,
        }
    }

    /// A failed test; an empty reason is replaced by a generic one.
    #[must_use]
    pub fn failed(name: impl Into<String>, reason: Option<String>) -> Self {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "test failed".to_string());
        Self {
            name: name.into(),
            suite: None,
            status: TestStatus::Failed,
            reason: Some(reason),
            gas: None,
        }
    }
}

/// Aggregate counts for a test run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
}

impl TestSummary {
    /// Count passed/failed over a list of test cases.
    #[must_use]
    pub fn from_cases(cases: &[TestCase]) -> Self {
        let passed = cases
            .iter()
            .filter(|c| c.status == TestStatus::Passed)
            .count();
        let failed = cases.len() - passed;
        Self {
            total: u32::try_from(cases.len()).unwrap_or(u32::MAX),
            passed: u32::try_from(passed).unwrap_or(u32::MAX),
            failed: u32::try_from(failed).unwrap_or(u32::MAX),
        }
    }
}
