use std::path::Path;

use anyhow::{Context, bail};
use lec_core::lesson::SubmittedFile;
use lec_runner::Runner;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SaveArgs;
use crate::commands::shared::key::progress_key;
use crate::output::output;

/// Handle `lct save`.
pub async fn handle(
    args: &SaveArgs,
    runner: &Runner,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let key = progress_key(&args.progress)?;
    let main = match &args.main {
        Some(main) => {
            if !args.files.contains(main) {
                bail!("--main {} is not among the submitted files", main.display());
            }
            main.as_path()
        }
        None => args.files[0].as_path(),
    };

    let mut submitted = Vec::with_capacity(args.files.len());
    for path in &args.files {
        submitted.push(read_submission(path, path == main)?);
    }

    let response = runner.save(&key, &submitted).await?;
    output(&response, flags.format)
}

fn read_submission(path: &Path, is_main: bool) -> anyhow::Result<SubmittedFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(SubmittedFile {
        path: Some(path.to_string_lossy().into_owned()),
        content,
        is_main,
    })
}
