//! Structured (JSON) compiler output.

use std::path::Path;

use lec_core::entities::Diagnostic;
use lec_core::enums::Severity;
use serde::Deserialize;

use super::text::LOCATION;
use crate::json;

#[derive(Debug, Deserialize)]
struct Document {
    errors: Option<Vec<RawError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawError {
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    formatted_message: Option<String>,
    #[serde(default)]
    source_location: Option<SourceLocation>,
}

#[derive(Debug, Deserialize)]
struct SourceLocation {
    file: Option<String>,
    #[serde(default)]
    start: Option<i64>,
}

/// `None` when stdout holds no JSON document with an `errors` array.
pub(super) fn parse(stdout: &str, cwd: Option<&Path>) -> Option<Vec<Diagnostic>> {
    let doc: Document = json::extract(stdout)?;
    let errors = doc.errors?;
    Some(errors.into_iter().map(|raw| convert(raw, cwd)).collect())
}

fn convert(raw: RawError, cwd: Option<&Path>) -> Diagnostic {
    // Unrecognized tags never block a build; a missing tag does.
    let severity = raw
        .severity
        .as_deref()
        .map_or(Severity::Error, |tag| {
            Severity::from_tag(tag).unwrap_or(Severity::Warning)
        });
    let message = raw
        .message
        .clone()
        .or_else(|| raw.formatted_message.clone())
        .unwrap_or_default();

    let mut diagnostic = Diagnostic::new(severity, message.trim());
    diagnostic.code = raw.error_code.filter(|c| !c.is_empty());
    diagnostic.source = raw.kind.filter(|k| !k.is_empty());

    if let Some(loc) = raw
        .formatted_message
        .as_deref()
        .and_then(|text| LOCATION.captures(text))
    {
        diagnostic.file = Some(loc[1].trim().to_string());
        diagnostic.line = loc[2].parse().ok();
        diagnostic.column = loc[3].parse().ok();
    } else if let Some(location) = raw.source_location {
        if let (Some(file), Some(start), Some(cwd)) = (&location.file, location.start, cwd)
            && let Some((line, column)) = line_column(&cwd.join(file), start)
        {
            diagnostic.line = Some(line);
            diagnostic.column = Some(column);
        }
        diagnostic.file = location.file;
    }

    diagnostic
}

/// 1-based line and column of byte `offset` in the file at `path`.
fn line_column(path: &Path, offset: i64) -> Option<(u32, u32)> {
    let offset = usize::try_from(offset).ok()?;
    let content = std::fs::read(path).ok()?;
    let prefix = content.get(..offset)?;

    let line = prefix.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = prefix
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    let column = offset - line_start + 1;
    Some((u32::try_from(line).ok()?, u32::try_from(column).ok()?))
}
