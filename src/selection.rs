//! Selectable entities of the project tree.
//!
//! `Selection` is a tagged id that the list view, the collapsed-set and the
//! action handlers pass around. `Entity` is the borrowed form it resolves to.

use crate::project::{Project, Subproject};
use crate::task::Task;

/// A reference to one node of the tree by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Selection {
    Project(u64),
    Subproject(u64),
    Task(u64),
}

impl Selection {
    /// Lowercase kind, for messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Selection::Project(_) => "project",
            Selection::Subproject(_) => "subproject",
            Selection::Task(_) => "task",
        }
    }
}

/// A borrowed node of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity<'a> {
    Project(&'a Project),
    Subproject(&'a Subproject),
    Task(&'a Task),
}

impl<'a> Entity<'a> {
    /// The selection that resolves to this node.
    pub fn selection(&self) -> Selection {
        match self {
            Entity::Project(p) => Selection::Project(p.id),
            Entity::Subproject(s) => Selection::Subproject(s.id),
            Entity::Task(t) => Selection::Task(t.id),
        }
    }

    /// The displayed name: task text or project/subproject name.
    pub fn name(&self) -> &'a str {
        match self {
            Entity::Project(p) => &p.name,
            Entity::Subproject(s) => &s.name,
            Entity::Task(t) => &t.text,
        }
    }
}

/// Resolve a selection against the tree.
pub fn lookup(projects: &[Project], selection: Selection) -> Option<Entity<'_>> {
    match selection {
        Selection::Project(id) => projects.iter().find(|p| p.id == id).map(Entity::Project),
        Selection::Subproject(id) => projects
            .iter()
            .flat_map(|p| p.subprojects.iter())
            .find(|s| s.id == id)
            .map(Entity::Subproject),
        Selection::Task(id) => projects
            .iter()
            .flat_map(|p| p.subprojects.iter())
            .flat_map(|s| s.tasks.iter())
            .find(|t| t.id == id)
            .map(Entity::Task),
    }
}

/// Mutable project by id.
pub fn project_mut(projects: &mut [Project], id: u64) -> Option<&mut Project> {
    projects.iter_mut().find(|p| p.id == id)
}

/// Mutable subproject by id, searching every project.
pub fn subproject_mut(projects: &mut [Project], id: u64) -> Option<&mut Subproject> {
    projects
        .iter_mut()
        .flat_map(|p| p.subprojects.iter_mut())
        .find(|s| s.id == id)
}

/// Mutable task by id, searching the whole tree.
pub fn task_mut(projects: &mut [Project], id: u64) -> Option<&mut Task> {
    projects
        .iter_mut()
        .flat_map(|p| p.subprojects.iter_mut())
        .flat_map(|s| s.tasks.iter_mut())
        .find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tree() -> Vec<Project> {
        let due = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap();
        let mut p = Project::new(1, "Health");
        let mut s = Subproject::new(2, 1, "Running");
        s.add_task(Task::new(3, "Intervals", 2, 0, false, due));
        p.add_subproject(s);
        vec![p]
    }

    #[test]
    fn test_lookup_each_kind() {
        let projects = tree();
        assert_eq!(lookup(&projects, Selection::Project(1)).map(|e| e.name()), Some("Health"));
        assert_eq!(lookup(&projects, Selection::Subproject(2)).map(|e| e.name()), Some("Running"));
        assert_eq!(lookup(&projects, Selection::Task(3)).map(|e| e.name()), Some("Intervals"));
    }

    #[test]
    fn test_name_borrows_from_the_tree() {
        let projects = tree();
        let name = {
            let entity = lookup(&projects, Selection::Task(3)).unwrap();
            entity.name()
        };
        assert_eq!(name, "Intervals");
    }

    #[test]
    fn test_lookup_is_kind_aware() {
        let projects = tree();
        // Id 1 exists, but not as a task.
        assert!(lookup(&projects, Selection::Task(1)).is_none());
        assert!(lookup(&projects, Selection::Project(3)).is_none());
    }

    #[test]
    fn test_mutable_accessors() {
        let mut projects = tree();
        task_mut(&mut projects, 3).unwrap().done = true;
        subproject_mut(&mut projects, 2).unwrap().name = "Cycling".into();
        project_mut(&mut projects, 1).unwrap().name = "Fitness".into();
        assert!(projects[0].subprojects[0].tasks[0].done);
        assert_eq!(projects[0].subprojects[0].name, "Cycling");
        assert_eq!(projects[0].name, "Fitness");
    }
}
