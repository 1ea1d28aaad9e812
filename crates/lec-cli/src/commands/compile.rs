use lec_runner::Runner;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunArgs;
use crate::commands::shared::key::progress_key;
use crate::commands::shared::lesson::load_lesson;
use crate::output::output;

/// Handle `lct compile`.
pub async fn handle(
    args: &RunArgs,
    runner: &Runner,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let key = progress_key(&args.progress)?;
    let lesson = load_lesson(args.lesson_file.as_deref())?;
    let response = runner.compile(&key, &lesson).await?;
    output(&response, flags.format)
}
