use anyhow::Context;
use lec_core::keys::ProgressKey;
use lec_runner::Runner;

use crate::cli::root_commands::ProgressArgs;

/// Validate the student/course/lesson flags into a progress key.
pub fn progress_key(args: &ProgressArgs) -> anyhow::Result<ProgressKey> {
    Runner::key(&args.student, &args.course, &args.lesson).with_context(|| {
        format!(
            "invalid lesson identity (student='{}', course='{}', lesson='{}')",
            args.student, args.course, args.lesson
        )
    })
}
