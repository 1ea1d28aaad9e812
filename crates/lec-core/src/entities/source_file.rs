use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FileType;

/// A persisted student source file. Unique by `(progress_id, file_name)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SourceFile {
    pub id: String,
    pub progress_id: String,
    /// Canonical file name, derived from the declared contract name when possible.
    pub file_name: String,
    /// Workspace-relative path, e.g. `src/Counter.sol`.
    pub file_path: String,
    pub content: String,
    pub file_type: FileType,
    pub is_main: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
