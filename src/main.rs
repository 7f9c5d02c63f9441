//! # tako - terminal task and schedule tracker
//!
//! Keeps a tree of projects, subprojects and tasks in a local JSON database and
//! shows it as a collapsible list in the terminal, alongside a weekly
//! hour-by-weekday schedule grid.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the interactive list
//! tako
//!
//! # Or work from the command line
//! tako add-project Health
//! tako add-subproject Health Running
//! tako add-task Health Running "Intervals" --expected 3 --due current
//! tako list --all
//! tako plan --day 1 --hour 7 Health Running
//! tako schedule
//! ```
//!
//! ## Keys
//!
//! - `p` / `s` / `t` - new project, subproject (on a project), task (on a subproject)
//! - `r` rename, `d` toggle done
//! - `z a` fold the selection, `z A` fold or unfold everything, `z z` show or hide done tasks
//! - `S` weekly schedule, `?` help, `q` quit
//!
//! Data is stored in `~/.tako/db.json`; set `TAKO_LOG=debug` for a more verbose
//! `~/.tako/tako.log`.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod db;
pub mod error;
pub mod flatten;
pub mod logging;
pub mod parse;
pub mod project;
pub mod schedule;
pub mod selection;
pub mod task;
pub mod tracker;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod keymap;
    pub mod prompt;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use db::JsonStore;
use task::NewTask;
use tracker::Tracker;

fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let config = Config::resolve(cli.db.as_deref());
    if let Err(e) = config.ensure_data_dir() {
        eprintln!("Failed to create data directory {}: {}", config.data_dir().display(), e);
        std::process::exit(1);
    }
    if let Err(e) = logging::init(&config) {
        eprintln!("Failed to open log file {}: {}", config.log_path.display(), e);
    }
    tracing::debug!(db = %config.db_path.display(), "resolved configuration");

    if let Err(e) = run(cli.command.unwrap_or(Commands::Ui), &config) {
        tracing::error!(error = %e, "command failed");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &Config) -> Result<(), CmdError> {
    let store = JsonStore::new(&config.db_path);

    if let Commands::Ui = command {
        return cmd_ui(store);
    }

    let mut tracker = Tracker::open(store)?;
    match command {
        Commands::Ui | Commands::Completions { .. } => {}
        Commands::List { all, collapsed } => cmd_list(&mut tracker, all, collapsed),
        Commands::Schedule => cmd_schedule(&tracker)?,
        Commands::AddProject { name } => cmd_add_project(&mut tracker, &name)?,
        Commands::AddSubproject { project, name } => cmd_add_subproject(&mut tracker, &project, &name)?,
        Commands::AddTask {
            project,
            subproject,
            name,
            expected,
            spent,
            done,
            due,
        } => cmd_add_task(
            &mut tracker,
            &project,
            &subproject,
            NewTask {
                name,
                expected,
                spent,
                done,
                due,
            },
        )?,
        Commands::Rename {
            project,
            subproject,
            task,
            to,
        } => cmd_rename(&mut tracker, &project, subproject.as_deref(), task.as_deref(), &to)?,
        Commands::Done {
            project,
            subproject,
            task,
        } => cmd_done(&mut tracker, &project, &subproject, &task)?,
        Commands::Plan {
            day,
            hour,
            project,
            subproject,
        } => cmd_plan(&mut tracker, day, hour, &project, &subproject)?,
    }
    Ok(())
}
