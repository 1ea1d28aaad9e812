use anyhow::Context;
use lec_runner::Runner;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RunArgs;
use crate::commands::shared::key::progress_key;
use crate::commands::shared::lesson::load_lesson;
use crate::output::output;

/// Handle `lct test`.
pub async fn handle(
    args: &RunArgs,
    runner: &Runner,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let key = progress_key(&args.progress)?;
    let lesson = load_lesson(args.lesson_file.as_deref())?;
    let timeout = runner.config().toolchain.test_timeout_secs;

    let response = runner.run_tests(&key, &lesson).await.map_err(|error| {
        let timed_out = error.is_timeout();
        let error = anyhow::Error::new(error);
        if timed_out {
            error.context(format!("tests for {key} did not finish within {timeout}s"))
        } else {
            error
        }
    })?;
    output(&response, flags.format)
}
