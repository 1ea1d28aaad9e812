//! Error type for lec-db.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A lookup that must find a row found none.
    #[error("No result returned")]
    NoResult,

    /// A stored value could not be mapped back to its Rust type.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Diagnostics and test cases are stored as JSON text.
    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}
