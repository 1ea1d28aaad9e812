//! Severities, file types, run statuses, and workspace modes for Lectern.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of a normalized compiler diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Parse a compiler severity tag, case-insensitively.
    ///
    /// Accepts both the JSON tags (`"error"`) and the free-text headers
    /// (`"Error"`, `"Warning"`, `"Info"`).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    /// Whether this severity blocks a successful compilation.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DeclarationKind
// ---------------------------------------------------------------------------

/// Category of a top-level source declaration, in resolution priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Contract,
    AbstractContract,
    Interface,
    Library,
}

impl DeclarationKind {
    /// All kinds, highest priority first.
    pub const PRIORITY: [Self; 4] = [
        Self::Contract,
        Self::AbstractContract,
        Self::Interface,
        Self::Library,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::AbstractContract => "abstract_contract",
            Self::Interface => "interface",
            Self::Library => "library",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FileType
// ---------------------------------------------------------------------------

/// Persisted classification of a student source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Contract,
    Interface,
    Library,
    Test,
}

impl FileType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Interface => "interface",
            Self::Library => "library",
            Self::Test => "test",
        }
    }

    /// Classify a file from its declaration and whether it is a test file.
    #[must_use]
    pub const fn classify(kind: Option<DeclarationKind>, is_test: bool) -> Self {
        if is_test {
            return Self::Test;
        }
        match kind {
            Some(DeclarationKind::Interface) => Self::Interface,
            Some(DeclarationKind::Library) => Self::Library,
            Some(DeclarationKind::Contract | DeclarationKind::AbstractContract) | None => {
                Self::Contract
            }
        }
    }

    /// Workspace directory holding files of this type.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Contract | Self::Interface | Self::Library => "src",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TestStatus
// ---------------------------------------------------------------------------

/// Outcome of a single test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
}

impl TestStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TestRunStatus
// ---------------------------------------------------------------------------

/// Terminal state of a test run.
///
/// ```text
/// resolve ─┬─ no_code_found
///          ├─ no_contract_name
///          └─ compile gate ─┬─ compilation_failed
///                           └─ run ─┬─ test_compilation_failed
///                                   └─ completed
/// ```
///
/// Everything except `Completed` is a user-facing precondition or
/// diagnostics outcome, never a system fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestRunStatus {
    Completed,
    CompilationFailed,
    TestCompilationFailed,
    NoContractName,
    NoCodeFound,
}

impl TestRunStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::CompilationFailed => "compilation_failed",
            Self::TestCompilationFailed => "test_compilation_failed",
            Self::NoContractName => "no_contract_name",
            Self::NoCodeFound => "no_code_found",
        }
    }
}

impl fmt::Display for TestRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WorkspaceMode
// ---------------------------------------------------------------------------

/// How `ensure_workspace` treats an existing workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceMode {
    /// Create if missing, otherwise reuse as-is.
    #[default]
    Reuse,
    /// Wipe the storage-managed directories before reuse.
    Reset,
}

impl WorkspaceMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reuse => "reuse",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for WorkspaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
