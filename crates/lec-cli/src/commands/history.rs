use lec_runner::Runner;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ProgressArgs;
use crate::commands::shared::key::progress_key;
use crate::commands::shared::limit::effective_limit;
use crate::output::output;

/// Handle `lct history`.
pub async fn handle(
    args: &ProgressArgs,
    runner: &Runner,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let key = progress_key(args)?;
    let limit = effective_limit(flags.limit, 20);
    output(&runner.history(&key, limit).await?, flags.format)
}
