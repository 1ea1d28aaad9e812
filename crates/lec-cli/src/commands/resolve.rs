use anyhow::Context;
use lec_core::lesson::SubmittedFile;
use lec_parser::resolve_declaration;
use lec_runner::resolve_submission;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResolveArgs;
use crate::output::output;

/// Handle `lct resolve`.
pub fn handle(args: &ResolveArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let declaration = resolve_declaration(&content);
    let resolved = resolve_submission(&SubmittedFile {
        path: Some(args.file.to_string_lossy().into_owned()),
        content,
        is_main: false,
    })?;

    output(
        &json!({
            "declared_name": declaration.as_ref().map(|d| d.name.as_str()),
            "kind": declaration.map(|d| d.kind),
            "file_name": resolved.file_name,
            "file_path": resolved.file_path,
            "file_type": resolved.file_type,
        }),
        flags.format,
    )
}
