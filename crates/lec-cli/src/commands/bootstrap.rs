use lec_runner::Runner;
use lec_workspace::BootstrapOutcome;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BootstrapArgs;
use crate::output::output;

/// Handle `lct bootstrap`.
pub async fn handle(
    args: &BootstrapArgs,
    runner: &Runner,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let outcome = runner.bootstrap(&args.course).await?;
    let library = lec_workspace::shared_library_path(&runner.config().workspace, &args.course);

    let response = match outcome {
        BootstrapOutcome::AlreadyPresent => json!({
            "course_id": args.course,
            "library": library,
            "status": "already_present",
        }),
        BootstrapOutcome::Copied {
            source,
            dependencies,
        } => json!({
            "course_id": args.course,
            "library": library,
            "status": "copied",
            "source": source,
            "dependencies": dependencies,
        }),
    };
    output(&response, flags.format)
}
