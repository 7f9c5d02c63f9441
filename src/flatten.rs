//! Flattening of the project tree into list rows.
//!
//! The list view never edits its rows; it rebuilds them from the projects, the
//! collapsed-set and the show-done flag after every change.

use std::collections::BTreeSet;

use crate::project::Project;
use crate::selection::{Entity, Selection};

/// Width the task name is padded to.
pub const TASK_NAME_WIDTH: usize = 20;
/// Marker appended to collapsed projects and subprojects.
pub const COLLAPSED_MARKER: &str = " …";

/// Walk the tree in order, skipping children of collapsed nodes and, unless
/// `show_done` is set, tasks that are done.
pub fn flatten<'a>(
    projects: &'a [Project],
    collapsed: &BTreeSet<Selection>,
    show_done: bool,
) -> Vec<Entity<'a>> {
    let mut items = Vec::new();
    for p in projects {
        items.push(Entity::Project(p));
        if collapsed.contains(&Selection::Project(p.id)) {
            continue;
        }
        for sp in &p.subprojects {
            items.push(Entity::Subproject(sp));
            if collapsed.contains(&Selection::Subproject(sp.id)) {
                continue;
            }
            items.extend(
                sp.tasks
                    .iter()
                    .filter(|t| show_done || !t.is_done())
                    .map(Entity::Task),
            );
        }
    }
    items
}

/// Format one entry as a list line.
pub fn format_entry(entry: &Entity<'_>, collapsed: &BTreeSet<Selection>, show_done: bool) -> String {
    let marker = if collapsed.contains(&entry.selection()) {
        COLLAPSED_MARKER
    } else {
        ""
    };
    match entry {
        Entity::Project(p) => format!("{}{}", p.name, marker),
        Entity::Subproject(s) => format!(" └ {}{}", s.name, marker),
        Entity::Task(t) => {
            let done = if show_done {
                if t.done { "[x] " } else { "[ ] " }
            } else {
                ""
            };
            format!(
                "   └ {}{:width$} [{:3} / {:3}] [{}]",
                done,
                t.text,
                t.spent,
                t.expected,
                t.due.format("%Y-%m-%d"),
                width = TASK_NAME_WIDTH
            )
        }
    }
}

/// Flatten and format in one pass, keeping each line's selection alongside it.
pub fn rows(
    projects: &[Project],
    collapsed: &BTreeSet<Selection>,
    show_done: bool,
) -> Vec<(Selection, String)> {
    flatten(projects, collapsed, show_done)
        .iter()
        .map(|e| (e.selection(), format_entry(e, collapsed, show_done)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Subproject;
    use crate::task::Task;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 28).unwrap()
    }

    /// Health(1) > Running(2) > [Intervals(3), Long run(4, done)], Strength(5) > [Squats(6)]
    /// Work(7) > Reports(8)
    fn tree() -> Vec<Project> {
        let mut health = Project::new(1, "Health");
        let mut running = Subproject::new(2, 1, "Running");
        running.add_task(Task::new(3, "Intervals", 2, 1, false, due()));
        running.add_task(Task::new(4, "Long run", 3, 3, true, due()));
        let mut strength = Subproject::new(5, 1, "Strength");
        strength.add_task(Task::new(6, "Squats", 1, 0, false, due()));
        health.add_subproject(running);
        health.add_subproject(strength);
        let mut work = Project::new(7, "Work");
        work.add_subproject(Subproject::new(8, 7, "Reports"));
        vec![health, work]
    }

    fn selections(projects: &[Project], collapsed: &BTreeSet<Selection>, show: bool) -> Vec<Selection> {
        flatten(projects, collapsed, show).iter().map(|e| e.selection()).collect()
    }

    #[test]
    fn test_order_hides_done_tasks_by_default() {
        let projects = tree();
        assert_eq!(
            selections(&projects, &BTreeSet::new(), false),
            vec![
                Selection::Project(1),
                Selection::Subproject(2),
                Selection::Task(3),
                Selection::Subproject(5),
                Selection::Task(6),
                Selection::Project(7),
                Selection::Subproject(8),
            ]
        );
    }

    #[test]
    fn test_show_done_includes_done_tasks_in_place() {
        let projects = tree();
        let items = selections(&projects, &BTreeSet::new(), true);
        assert_eq!(items[2..4], [Selection::Task(3), Selection::Task(4)]);
        assert_eq!(items.len(), 8);
    }

    #[test]
    fn test_collapsed_nodes_hide_children_only() {
        let projects = tree();
        let collapsed = BTreeSet::from([Selection::Project(7), Selection::Subproject(2)]);
        assert_eq!(
            selections(&projects, &collapsed, true),
            vec![
                Selection::Project(1),
                Selection::Subproject(2),
                Selection::Subproject(5),
                Selection::Task(6),
                Selection::Project(7),
            ]
        );
    }

    #[test]
    fn test_collapsed_project_hides_whole_subtree() {
        let projects = tree();
        let collapsed = BTreeSet::from([Selection::Project(1)]);
        assert_eq!(
            selections(&projects, &collapsed, false),
            vec![Selection::Project(1), Selection::Project(7), Selection::Subproject(8)]
        );
    }

    #[test]
    fn test_format_lines() {
        let projects = tree();
        let collapsed = BTreeSet::from([Selection::Subproject(5)]);
        let lines: Vec<String> = rows(&projects, &collapsed, false).into_iter().map(|(_, l)| l).collect();
        assert_eq!(
            lines,
            vec![
                "Health".to_string(),
                " └ Running".to_string(),
                "   └ Intervals            [  1 /   2] [2024-03-28]".to_string(),
                " └ Strength …".to_string(),
                "Work".to_string(),
                " └ Reports".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_done_markers_when_showing_done() {
        let projects = tree();
        let lines: Vec<String> = rows(&projects, &BTreeSet::new(), true).into_iter().map(|(_, l)| l).collect();
        assert_eq!(lines[2], "   └ [ ] Intervals            [  1 /   2] [2024-03-28]");
        assert_eq!(lines[3], "   └ [x] Long run             [  3 /   3] [2024-03-28]");
    }

    #[test]
    fn test_long_task_names_are_not_truncated() {
        let mut p = Project::new(1, "P");
        let mut s = Subproject::new(2, 1, "S");
        s.add_task(Task::new(3, "A very long task name indeed", 10, 100, false, due()));
        p.add_subproject(s);
        let projects = vec![p];
        let line = &rows(&projects, &BTreeSet::new(), false)[2].1;
        assert_eq!(line, "   └ A very long task name indeed [100 /  10] [2024-03-28]");
    }

    #[test]
    fn test_single_project_single_row() {
        let projects = vec![Project::new(1, "Health")];
        assert_eq!(rows(&projects, &BTreeSet::new(), false), vec![(Selection::Project(1), "Health".to_string())]);
    }
}
