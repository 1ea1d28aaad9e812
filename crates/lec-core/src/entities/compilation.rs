use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Diagnostic;

/// Immutable snapshot of one compile invocation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompilationResult {
    pub id: String,
    pub progress_id: String,
    pub success: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub error_count: u32,
    pub warning_count: u32,
    pub exit_code: Option<i32>,
    pub created_at: DateTime<Utc>,
}
