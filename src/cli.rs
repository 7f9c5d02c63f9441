use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal task and weekly schedule tracker.
/// Storage defaults to ~/.tako/db.json or a path passed via --db.
/// Run without a subcommand to open the interactive UI.
#[derive(Parser)]
#[command(name = "tako", version, about = "Projects, tasks and a weekly schedule in the terminal")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
