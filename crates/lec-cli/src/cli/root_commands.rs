use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Save source files for a lesson.
    Save(SaveArgs),
    /// List a lesson's saved files.
    Files(ProgressArgs),
    /// Compile a lesson's saved sources.
    Compile(RunArgs),
    /// Run the lesson's evaluator test against the saved sources.
    Test(RunArgs),
    /// Show progress and the latest compile and test results.
    Status(ProgressArgs),
    /// List past compile and test results, most recent first.
    History(ProgressArgs),
    /// Delete a lesson's progress and clear its workspace sources.
    Reset(ProgressArgs),
    /// Populate a course's shared dependency library.
    Bootstrap(BootstrapArgs),
    /// Print the name a source file would be stored under.
    Resolve(ResolveArgs),
}

/// Identifies one student's progress on one lesson.
#[derive(Clone, Debug, Args)]
pub struct ProgressArgs {
    /// Student identifier.
    #[arg(long)]
    pub student: String,

    /// Course identifier.
    #[arg(long)]
    pub course: String,

    /// Lesson identifier.
    #[arg(long)]
    pub lesson: String,
}

#[derive(Clone, Debug, Args)]
pub struct SaveArgs {
    #[command(flatten)]
    pub progress: ProgressArgs,

    /// Source files to submit.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// File to mark as the main contract (defaults to the first file).
    #[arg(long)]
    pub main: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub progress: ProgressArgs,

    /// Lesson data (starter code, evaluator test, template) as JSON or TOML.
    #[arg(long)]
    pub lesson_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct BootstrapArgs {
    /// Course identifier.
    #[arg(long)]
    pub course: String,
}

#[derive(Clone, Debug, Args)]
pub struct ResolveArgs {
    /// Source file to inspect.
    pub file: PathBuf,
}
