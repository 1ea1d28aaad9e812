use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A student's progress on one lesson of one course.
///
/// Owns the lesson's current source files and an append-only history of
/// compilation and test results.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StudentProgress {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub lesson_id: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
