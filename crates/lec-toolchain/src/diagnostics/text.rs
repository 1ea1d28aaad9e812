//! Free-text compiler output.
//!
//! Recognized headers:
//!
//! ```text
//! Error (7576): Undeclared identifier.
//! Warning: This declaration shadows an existing declaration.
//! TypeError: Member "x" not found.
//! ```
//!
//! followed, within a few lines, by a `--> file:line:col` location.

use std::sync::LazyLock;

use lec_core::entities::Diagnostic;
use lec_core::enums::Severity;
use regex::Regex;

/// How far below a header to look for its location line.
const LOCATION_LOOKAHEAD: usize = 4;

const BANNER: &str = "Compiler run failed";

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z]*Error|Warning|Info)(?:\s*\(([0-9]+)\))?:\s*(.*?)\s*$")
        .expect("valid regex")
});

pub(super) static LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-->\s*([^\s:][^:]*):(\d+):(\d+)").expect("valid regex")
});

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid regex"));

pub(super) fn parse(output: &str) -> Vec<Diagnostic> {
    let clean = ANSI.replace_all(output, "");
    let lines: Vec<&str> = clean.lines().collect();
    let mut diagnostics = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = HEADER.captures(line) else {
            continue;
        };
        let message = &caps[3];
        if message.is_empty() || message.starts_with(BANNER) {
            continue;
        }

        let tag = &caps[1];
        let (severity, source) = classify(tag);
        let mut diagnostic = Diagnostic::new(severity, message);
        diagnostic.code = caps.get(2).map(|m| m.as_str().to_string());
        diagnostic.source = source;

        let following = lines.iter().skip(idx + 1).take(LOCATION_LOOKAHEAD);
        for next in following {
            if HEADER.is_match(next) {
                break;
            }
            if let Some(loc) = LOCATION.captures(next) {
                diagnostic.file = Some(loc[1].trim().to_string());
                diagnostic.line = loc[2].parse().ok();
                diagnostic.column = loc[3].parse().ok();
                break;
            }
        }
        diagnostics.push(diagnostic);
    }
    diagnostics
}

fn classify(tag: &str) -> (Severity, Option<String>) {
    match tag {
        "Warning" => (Severity::Warning, None),
        "Info" => (Severity::Info, None),
        "Error" => (Severity::Error, None),
        category => (Severity::Error, Some(category.to_string())),
    }
}

/// First non-empty line that is not the failure banner, with any leading
/// `Error:` label removed.
pub(super) fn first_meaningful_line(output: &str) -> Option<&str> {
    output
        .lines()
        .map(str::trim)
        .map(|line| line.strip_prefix("Error:").map_or(line, str::trim))
        .find(|line| !line.is_empty() && !line.starts_with(BANNER))
}
