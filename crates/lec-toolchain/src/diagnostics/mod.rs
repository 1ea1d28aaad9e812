//! Compiler diagnostic normalization.
//!
//! The toolchain reports problems either as a JSON document with an `errors`
//! array or as human-readable text. Both paths produce [`Diagnostic`]s, which
//! are deduplicated by `(file, line, column, message)` keeping the first
//! occurrence and its position.

mod structured;
mod text;

use std::collections::HashSet;
use std::path::Path;

use lec_core::entities::Diagnostic;
use lec_core::enums::Severity;

/// Diagnostics from one invocation, split by whether they block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub errors: Vec<Diagnostic>,
    /// Warnings and informational messages.
    pub warnings: Vec<Diagnostic>,
    /// Whether a JSON document was found.
    pub structured: bool,
    /// First line of human-readable output, used when the exit code reports
    /// failure but nothing could be parsed.
    pub fallback_message: Option<String>,
}

/// Final compile verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Normalize toolchain output.
///
/// `cwd` is the directory the toolchain ran in; it is used to turn byte
/// offsets into line/column when a structured entry has no formatted
/// location.
#[must_use]
pub fn normalize(stdout: &str, stderr: &str, cwd: Option<&Path>) -> Normalized {
    let (parsed, structured) = match structured::parse(stdout, cwd) {
        Some(parsed) => (parsed, true),
        None => (text::parse(&format!("{stdout}\n{stderr}")), false),
    };

    let mut seen = HashSet::new();
    let mut normalized = Normalized {
        structured,
        fallback_message: text::first_meaningful_line(stderr)
            .or_else(|| text::first_meaningful_line(stdout))
            .map(str::to_string),
        ..Normalized::default()
    };
    for diagnostic in parsed {
        if !seen.insert(diagnostic.key()) {
            continue;
        }
        if diagnostic.severity.is_blocking() {
            normalized.errors.push(diagnostic);
        } else {
            normalized.warnings.push(diagnostic);
        }
    }

    tracing::debug!(
        structured,
        errors = normalized.errors.len(),
        warnings = normalized.warnings.len(),
        "normalized diagnostics"
    );
    normalized
}

impl Normalized {
    /// Combine with the exit code. A failing exit with no parsed error still
    /// yields one error, so failure is never reported without a reason.
    #[must_use]
    pub fn into_outcome(self, exit_code: Option<i32>) -> Outcome {
        let mut errors = self.errors;
        let exited_cleanly = exit_code == Some(0);

        if !exited_cleanly && errors.is_empty() {
            let message = self.fallback_message.unwrap_or_else(|| match exit_code {
                Some(code) => format!("compiler exited with status {code}"),
                None => "compiler was terminated by a signal".to_string(),
            });
            errors.push(Diagnostic::new(Severity::Error, message));
        }

        Outcome {
            success: exited_cleanly && errors.is_empty(),
            errors,
            warnings: self.warnings,
        }
    }
}
