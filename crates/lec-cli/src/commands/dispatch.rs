use lec_runner::Runner;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    runner: &Runner,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Save(args) => commands::save::handle(&args, runner, flags).await,
        Commands::Files(args) => commands::files::handle(&args, runner, flags).await,
        Commands::Compile(args) => commands::compile::handle(&args, runner, flags).await,
        Commands::Test(args) => commands::test::handle(&args, runner, flags).await,
        Commands::Status(args) => commands::status::handle(&args, runner, flags).await,
        Commands::History(args) => commands::history::handle(&args, runner, flags).await,
        Commands::Reset(args) => commands::reset::handle(&args, runner, flags).await,
        Commands::Bootstrap(args) => commands::bootstrap::handle(&args, runner, flags).await,
        Commands::Resolve(args) => commands::resolve::handle(&args, flags),
    }
}
