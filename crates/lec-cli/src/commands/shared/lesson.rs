use std::path::Path;

use anyhow::Context;
use lec_core::lesson::LessonCode;

/// Load lesson data from a `.toml` file, or JSON for any other extension.
/// No file means a lesson with no starter code and no evaluator.
pub fn load_lesson(path: Option<&Path>) -> anyhow::Result<LessonCode> {
    let Some(path) = path else {
        return Ok(LessonCode::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read lesson file {}", path.display()))?;
    parse_lesson(&raw, path)
}

fn parse_lesson(raw: &str, path: &Path) -> anyhow::Result<LessonCode> {
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(raw)
            .with_context(|| format!("invalid TOML lesson file {}", path.display()))
    } else {
        serde_json::from_str(raw)
            .with_context(|| format!("invalid JSON lesson file {}", path.display()))
    }
}
