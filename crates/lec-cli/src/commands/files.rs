use lec_core::entities::SourceFile;
use lec_runner::Runner;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProgressArgs;
use crate::commands::shared::key::progress_key;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FileListResponse {
    files: Vec<SourceFile>,
}

/// Handle `lct files`.
pub async fn handle(
    args: &ProgressArgs,
    runner: &Runner,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let key = progress_key(args)?;
    let files = runner.files(&key).await?;
    output(&FileListResponse { files }, flags.format)
}
