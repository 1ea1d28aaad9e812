//! Natural keys for progress records and on-disk workspaces.
//!
//! Course and student IDs end up as directory names, so both keys validate
//! their segments on construction: ASCII alphanumerics, `-` and `_` only.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// Check that `value` can be used verbatim as one path segment.
#[must_use]
pub fn is_safe_segment(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 128
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn checked(field: &'static str, value: &str) -> Result<String, CoreError> {
    if is_safe_segment(value) {
        Ok(value.to_string())
    } else {
        Err(CoreError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

/// Identity of one student's workspace for one course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct WorkspaceKey {
    pub course_id: String,
    pub student_id: String,
}

impl WorkspaceKey {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidIdentifier` if either ID is not a safe segment.
    pub fn new(course_id: &str, student_id: &str) -> Result<Self, CoreError> {
        Ok(Self {
            course_id: checked("course_id", course_id)?,
            student_id: checked("student_id", student_id)?,
        })
    }
}

impl fmt::Display for WorkspaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.course_id, self.student_id)
    }
}

/// Natural key of a `StudentProgress` record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ProgressKey {
    pub student_id: String,
    pub course_id: String,
    pub lesson_id: String,
}

impl ProgressKey {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidIdentifier` if any ID is not a safe segment.
    pub fn new(student_id: &str, course_id: &str, lesson_id: &str) -> Result<Self, CoreError> {
        Ok(Self {
            student_id: checked("student_id", student_id)?,
            course_id: checked("course_id", course_id)?,
            lesson_id: checked("lesson_id", lesson_id)?,
        })
    }

    /// The workspace this progress record materializes into.
    #[must_use]
    pub fn workspace(&self) -> WorkspaceKey {
        WorkspaceKey {
            course_id: self.course_id.clone(),
            student_id: self.student_id.clone(),
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.course_id, self.student_id, self.lesson_id)
    }
}
