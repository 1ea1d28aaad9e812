use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Severity;

/// A normalized compiler message.
///
/// Both the structured (JSON) and free-text parsing paths produce this shape.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Compiler error code, e.g. `"7576"`.
    pub code: Option<String>,
    pub message: String,
    /// Workspace-relative file path as reported by the compiler.
    pub file: Option<String>,
    /// 1-based line.
    pub line: Option<u32>,
    /// 1-based column.
    pub column: Option<u32>,
    /// Compiler-reported category, e.g. `"DeclarationError"`.
    pub source: Option<String>,
}

/// Identity used to deduplicate diagnostics within one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagnosticKey {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    /// Build a location-less diagnostic.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            file: None,
            line: None,
            column: None,
            source: None,
        }
    }

    #[must_use]
    pub fn key(&self) -> DiagnosticKey {
        DiagnosticKey {
            file: self.file.clone(),
            line: self.line,
            column: self.column,
            message: self.message.clone(),
        }
    }

    /// `file:line:col` for display, or `None` when no file is known.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        let file = self.file.as_deref()?;
        Some(match (self.line, self.column) {
            (Some(line), Some(column)) => format!("{file}:{line}:{column}"),
            (Some(line), None) => format!("{file}:{line}"),
            _ => file.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_severity_and_code() {
        let mut a = Diagnostic::new(Severity::Error, "Undeclared identifier.");
        a.file = Some("src/Counter.sol".into());
        a.line = Some(5);
        let mut b = a.clone();
        b.severity = Severity::Warning;
        b.code = Some("7576".into());
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn location_formats() {
        let mut d = Diagnostic::new(Severity::Warning, "x");
        assert_eq!(d.location(), None);
        d.file = Some("src/A.sol".into());
        assert_eq!(d.location().as_deref(), Some("src/A.sol"));
        d.line = Some(3);
        d.column = Some(9);
        assert_eq!(d.location().as_deref(), Some("src/A.sol:3:9"));
    }
}
