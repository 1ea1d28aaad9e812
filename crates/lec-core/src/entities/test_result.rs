use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Diagnostic, TestCase, TestSummary};
use crate::enums::TestRunStatus;

/// Immutable snapshot of one evaluator test run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestResult {
    pub id: String,
    pub progress_id: String,
    pub success: bool,
    pub status: TestRunStatus,
    pub test_file_name: String,
    pub contract_name: Option<String>,
    pub tests: Vec<TestCase>,
    pub summary: TestSummary,
    /// Compiler errors from the gate or from the evaluator test itself.
    pub errors: Vec<Diagnostic>,
    pub created_at: DateTime<Utc>,
}
