//! Command implementations for the CLI interface.
//!
//! Every subcommand goes through the same `Tracker` the UI uses, so the
//! selection checks and persistence rules are identical in both front ends.

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Subcommand};
use clap_complete::{generate, Shell};

use crate::db::Store;
use crate::error::{ActionError, ParseError, StoreError};
use crate::parse::{parse_bool, parse_due};
use crate::schedule::{build_grid, GridRow, ScheduleEntry, GRID_COLUMNS};
use crate::selection::Entity;
use crate::task::NewTask;
use crate::tracker::{Request, Tracker};
use crate::tui::run::{run_tui, TuiError};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (the default).
    Ui,

    /// Print the project tree.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Collapse every project and subproject.
        #[arg(long)]
        collapsed: bool,
    },

    /// Print the latest weekly schedule.
    Schedule,

    /// Add a new project.
    AddProject {
        /// Project name.
        name: String,
    },

    /// Add a subproject under a project.
    AddSubproject {
        /// Existing project name.
        project: String,
        /// Subproject name.
        name: String,
    },

    /// Add a task under a subproject.
    AddTask {
        project: String,
        subproject: String,
        /// Task name.
        name: String,
        /// Expected effort.
        #[arg(long)]
        expected: i64,
        /// Effort spent so far.
        #[arg(long, default_value_t = 0)]
        spent: i64,
        /// Done flag: y/yes/true/on/1 or n/no/false/off/0.
        #[arg(long, default_value = "false", value_parser = parse_bool, action = ArgAction::Set)]
        done: bool,
        /// Due date: YYYY-MM-DD or "current" (the 28th of this month).
        #[arg(long, default_value = "current", value_parser = parse_due_today)]
        due: NaiveDate,
    },

    /// Rename a project, subproject or task.
    Rename {
        project: String,
        subproject: Option<String>,
        task: Option<String>,
        /// The new name.
        #[arg(long)]
        to: String,
    },

    /// Toggle a task's done flag.
    Done {
        project: String,
        subproject: String,
        task: String,
    },

    /// Assign a weekly slot in the latest schedule.
    Plan {
        /// Day of week, 1 = Monday .. 7 = Sunday.
        #[arg(long)]
        day: i64,
        /// Start hour, 0..23.
        #[arg(long)]
        hour: i64,
        project: String,
        subproject: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Errors reported by a command before exiting with status 1.
#[derive(Debug, thiserror::Error)]
pub enum CmdError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("UI error: {0}")]
    Tui(#[from] TuiError),
}

fn parse_due_today(s: &str) -> Result<NaiveDate, ParseError> {
    parse_due(s, Local::now().date_naive())
}

/// Launch the terminal user interface.
pub fn cmd_ui<S: Store>(store: S) -> Result<(), CmdError> {
    Ok(run_tui(store)?)
}

/// Print the flattened tree, one row per line.
pub fn cmd_list<S: Store>(tracker: &mut Tracker<S>, all: bool, collapsed: bool) {
    if all {
        tracker.toggle_inactive_tasks();
    }
    if collapsed {
        tracker.toggle_collapse(None);
    }
    let rows = tracker.rows();
    if rows.is_empty() {
        println!("No projects yet. Add one with `tako add-project <name>`.");
        return;
    }
    for (_, line) in rows {
        println!("{line}");
    }
}

/// Print the latest schedule as an aligned grid.
pub fn cmd_schedule<S: Store>(tracker: &Tracker<S>) -> Result<(), CmdError> {
    let schedule = tracker.latest_schedule()?;
    if schedule.is_none() {
        eprintln!("No schedule found");
    }
    for line in format_grid(&build_grid(schedule.as_ref())) {
        println!("{line}");
    }
    Ok(())
}

/// Pad every column to its widest cell.
pub fn format_grid(rows: &[GridRow]) -> Vec<String> {
    let mut widths = [0usize; GRID_COLUMNS];
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    rows.iter()
        .map(|row| {
            row.iter()
                .zip(widths.iter())
                .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Create a project.
pub fn cmd_add_project<S: Store>(tracker: &mut Tracker<S>, name: &str) -> Result<(), CmdError> {
    tracker.apply(Request::CreateProject { name: name.to_string() })?;
    println!("Added project '{name}'");
    Ok(())
}

/// Create a subproject under a project found by name.
pub fn cmd_add_subproject<S: Store>(tracker: &mut Tracker<S>, project: &str, name: &str) -> Result<(), CmdError> {
    let target = tracker.find(project, None, None)?;
    tracker.apply(Request::CreateSubproject {
        target: Some(target),
        name: name.to_string(),
    })?;
    println!("Added subproject '{name}' to '{project}'");
    Ok(())
}

/// Create a task under `project/subproject`.
pub fn cmd_add_task<S: Store>(
    tracker: &mut Tracker<S>,
    project: &str,
    subproject: &str,
    task: NewTask,
) -> Result<(), CmdError> {
    let target = tracker.find(project, Some(subproject), None)?;
    let name = task.name.clone();
    let due = task.due;
    tracker.apply(Request::CreateTask {
        target: Some(target),
        task,
    })?;
    println!("Added task '{name}' to '{project} / {subproject}' (due {due})");
    Ok(())
}

/// Rename a project, subproject or task found by name.
pub fn cmd_rename<S: Store>(
    tracker: &mut Tracker<S>,
    project: &str,
    subproject: Option<&str>,
    task: Option<&str>,
    to: &str,
) -> Result<(), CmdError> {
    let target = tracker.find(project, subproject, task)?;
    let old = tracker.lookup(target).map(|e| e.name().to_string()).unwrap_or_default();
    tracker.apply(Request::Rename {
        target: Some(target),
        name: to.to_string(),
    })?;
    println!("Renamed {} '{old}' to '{to}'", target.kind_name());
    Ok(())
}

/// Toggle a task's done flag.
pub fn cmd_done<S: Store>(tracker: &mut Tracker<S>, project: &str, subproject: &str, task: &str) -> Result<(), CmdError> {
    let target = tracker.find(project, Some(subproject), Some(task))?;
    match tracker.toggle_done(Some(target))? {
        Some(true) => println!("Marked '{task}' done"),
        Some(false) => println!("Marked '{task}' not done"),
        None => println!("Nothing to mark"),
    }
    Ok(())
}

/// Add a slot to the latest schedule.
pub fn cmd_plan<S: Store>(
    tracker: &mut Tracker<S>,
    day: i64,
    hour: i64,
    project: &str,
    subproject: &str,
) -> Result<(), CmdError> {
    // Only plan slots for work that exists; store the names as displayed.
    let target = tracker.find(project, Some(subproject), None)?;
    let (project_name, subproject_name) = match tracker.lookup(target) {
        Some(Entity::Subproject(sp)) => {
            let owner = tracker
                .projects()
                .iter()
                .find(|p| p.id == sp.project)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| project.to_string());
            (owner, sp.name.clone())
        }
        _ => (project.to_string(), subproject.to_string()),
    };
    let entry = ScheduleEntry::new(day, hour, &project_name, &subproject_name)?;
    tracker.plan(entry)?;
    println!("Planned {project_name} - {subproject_name} on day {day} at {hour:02}:00");
    Ok(())
}

/// Generate shell completions.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = crate::cli::Cli::command();
    generate(shell, &mut cmd, "tako", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn tracker() -> Tracker<MemoryStore> {
        Tracker::open(MemoryStore::default()).unwrap()
    }

    fn new_task(name: &str) -> NewTask {
        NewTask {
            name: name.into(),
            expected: 2,
            spent: 0,
            done: false,
            due: NaiveDate::from_ymd_opt(2024, 3, 28).unwrap(),
        }
    }

    #[test]
    fn test_add_commands_build_the_tree() {
        let mut t = tracker();
        cmd_add_project(&mut t, "Health").unwrap();
        cmd_add_subproject(&mut t, "health", "Running").unwrap();
        cmd_add_task(&mut t, "Health", "running", new_task("Intervals")).unwrap();

        let rows: Vec<String> = t.rows().into_iter().map(|(_, l)| l).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], " └ Running");
    }

    #[test]
    fn test_add_task_to_missing_subproject() {
        let mut t = tracker();
        cmd_add_project(&mut t, "Health").unwrap();
        let err = cmd_add_task(&mut t, "Health", "Swimming", new_task("Laps")).unwrap_err();
        assert_eq!(err.to_string(), "no subproject named 'Swimming'");
    }

    #[test]
    fn test_rename_and_done() {
        let mut t = tracker();
        cmd_add_project(&mut t, "Health").unwrap();
        cmd_add_subproject(&mut t, "Health", "Running").unwrap();
        cmd_add_task(&mut t, "Health", "Running", new_task("Intervals")).unwrap();

        cmd_done(&mut t, "Health", "Running", "Intervals").unwrap();
        assert!(t.store().projects[0].subprojects[0].tasks[0].done);
        cmd_rename(&mut t, "Health", Some("Running"), None, "Cycling").unwrap();
        assert_eq!(t.store().projects[0].subprojects[0].name, "Cycling");
    }

    #[test]
    fn test_plan_uses_stored_names_and_checks_range() {
        let mut t = tracker();
        cmd_add_project(&mut t, "Health").unwrap();
        cmd_add_subproject(&mut t, "Health", "Running").unwrap();

        cmd_plan(&mut t, 1, 7, "health", "running").unwrap();
        let schedule = t.latest_schedule().unwrap().unwrap();
        assert_eq!(schedule.entries[0].project, "Health");
        assert_eq!(schedule.entries[0].subproject, "Running");

        assert!(matches!(cmd_plan(&mut t, 8, 7, "Health", "Running"), Err(CmdError::Parse(_))));
    }

    #[test]
    fn test_format_grid_aligns_columns() {
        let lines = format_grid(&build_grid(None));
        assert_eq!(lines.len(), 25);
        assert!(lines[0].starts_with("Time  | Monday"));
        assert!(lines[1].starts_with("00:00 |"));
    }
}
