//! Errors raised while building core values.
//!
//! Storage, workspace, and toolchain failures have their own error types in
//! their crates; `lec-cli` collects everything with `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Identifiers become directory names, so each must be one safe path
    /// segment.
    #[error("invalid {field} '{value}': use ASCII letters, digits, '-' and '_' only")]
    InvalidIdentifier { field: &'static str, value: String },
}
