//! Projects and subprojects.
//!
//! Projects are the top level of the tree and own their subprojects, which in
//! turn own their tasks. A subproject only remembers its project by id.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// An RGB triple, stored as a three element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Foreground given to newly created projects.
pub const DEFAULT_FG: Rgb = Rgb(255, 0, 0);
/// Background given to newly created projects.
pub const DEFAULT_BG: Rgb = Rgb(255, 255, 255);

/// Top-level grouping of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub fg: Rgb,
    pub bg: Rgb,
    #[serde(default)]
    pub subprojects: Vec<Subproject>,
}

impl Project {
    /// Create an empty project with the default colour pair.
    pub fn new(id: u64, name: &str) -> Self {
        Project {
            id,
            name: name.to_string(),
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            subprojects: Vec::new(),
        }
    }

    /// Append a subproject.
    pub fn add_subproject(&mut self, subproject: Subproject) {
        self.subprojects.push(subproject);
    }

    /// Find a subproject by name, case-insensitively.
    pub fn find_subproject(&self, name: &str) -> Option<&Subproject> {
        let name = name.to_lowercase();
        self.subprojects.iter().find(|s| s.name.to_lowercase() == name)
    }
}

/// A named group of tasks under one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subproject {
    pub id: u64,
    pub name: String,
    /// Id of the project this subproject is listed under.
    pub project: u64,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Subproject {
    /// Create an empty subproject under `project`.
    pub fn new(id: u64, project: u64, name: &str) -> Self {
        Subproject {
            id,
            name: name.to_string(),
            project,
            tasks: Vec::new(),
        }
    }

    /// Append a task.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Find a task by its text, case-insensitively.
    pub fn find_task(&self, text: &str) -> Option<&Task> {
        let text = text.to_lowercase();
        self.tasks.iter().find(|t| t.text.to_lowercase() == text)
    }
}

/// Generate the next free id across every project, subproject and task.
pub fn next_id(projects: &[Project]) -> u64 {
    projects
        .iter()
        .flat_map(|p| {
            std::iter::once(p.id).chain(p.subprojects.iter().flat_map(|s| {
                std::iter::once(s.id).chain(s.tasks.iter().map(|t| t.id))
            }))
        })
        .max()
        .unwrap_or(0)
        + 1
}

/// Find a project by name, case-insensitively.
pub fn find_project<'a>(projects: &'a [Project], name: &str) -> Option<&'a Project> {
    let name = name.to_lowercase();
    projects.iter().find(|p| p.name.to_lowercase() == name)
}
