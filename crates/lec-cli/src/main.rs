use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("lct error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();

    // Pure text inspection, no config or storage needed.
    if let cli::Commands::Resolve(args) = &cli.command {
        return commands::resolve::handle(args, &flags);
    }

    let config = lec_config::LecternConfig::load_with_dotenv()
        .context("failed to load lectern configuration")?;
    tracing::debug!(
        root = %config.workspace.root,
        binary = %config.toolchain.binary,
        database = %config.database.path,
        "configuration loaded"
    );

    let runner = lec_runner::Runner::open(config)
        .await
        .context("failed to open lectern storage")?;

    commands::dispatch::dispatch(cli.command, &runner, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LECTERN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
