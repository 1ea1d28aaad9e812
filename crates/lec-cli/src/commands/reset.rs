use lec_runner::Runner;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProgressArgs;
use crate::commands::shared::key::progress_key;
use crate::output::output;

/// Handle `lct reset`.
pub async fn handle(
    args: &ProgressArgs,
    runner: &Runner,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let key = progress_key(args)?;
    output(&runner.reset(&key).await?, flags.format)
}
