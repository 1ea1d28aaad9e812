//! Response types returned by the orchestration layer and printed as JSON by `lct`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{
    CompilationResult, Diagnostic, SourceFile, StudentProgress, TestCase, TestResult, TestSummary,
};
use crate::enums::TestRunStatus;

/// Result of a compile request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompileResponse {
    pub success: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    /// Human-readable compiler output (stderr, falling back to stdout).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Raw stdout, kept when the structured document could not be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl CompileResponse {
    /// A failed response carrying one error and no compiler output.
    #[must_use]
    pub fn rejected(error: Diagnostic) -> Self {
        Self {
            success: false,
            errors: vec![error],
            warnings: Vec::new(),
            output: None,
            raw: None,
        }
    }
}

/// Result of a test request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TestRunResponse {
    pub success: bool,
    pub status: TestRunStatus,
    /// Outcome of the compile gate, absent when the run stopped before it.
    pub compilation: Option<CompileResponse>,
    pub tests: Vec<TestCase>,
    pub summary: TestSummary,
    pub test_file_name: String,
    pub contract_name: Option<String>,
    /// Compiler errors raised by the evaluator test itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_errors: Vec<Diagnostic>,
}

impl TestRunResponse {
    /// A run that ended before any tests executed.
    #[must_use]
    pub fn stopped(
        status: TestRunStatus,
        test_file_name: impl Into<String>,
        contract_name: Option<String>,
    ) -> Self {
        Self {
            success: false,
            status,
            compilation: None,
            tests: Vec::new(),
            summary: TestSummary::default(),
            test_file_name: test_file_name.into(),
            contract_name,
            test_errors: Vec::new(),
        }
    }
}

/// Response from `lct save`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SaveResponse {
    pub progress: StudentProgress,
    pub files: Vec<SourceFile>,
}

/// Response from `lct status`: latest-by-recency results.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusResponse {
    pub progress: Option<StudentProgress>,
    pub latest_compilation: Option<CompilationResult>,
    pub latest_test: Option<TestResult>,
}

/// Response from `lct reset`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResetResponse {
    pub progress_deleted: bool,
    pub workspace_reset: bool,
}

/// Response from `lct history`: results most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HistoryResponse {
    pub compilations: Vec<CompilationResult>,
    pub tests: Vec<TestResult>,
}
