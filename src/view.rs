//! UI-only tree state: which nodes are collapsed and whether done tasks show.
//!
//! None of this is persisted.

use std::collections::BTreeSet;

use crate::project::Project;
use crate::selection::Selection;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub collapsed: BTreeSet<Selection>,
    pub show_inactive_tasks: bool,
}

impl ViewState {
    /// Toggle one node, or with no target collapse everything when nothing is
    /// collapsed and expand everything otherwise.
    pub fn toggle_collapse(&mut self, item: Option<Selection>, projects: &[Project]) {
        match item {
            None if self.collapsed.is_empty() => {
                for p in projects {
                    self.collapsed.insert(Selection::Project(p.id));
                    self.collapsed
                        .extend(p.subprojects.iter().map(|sp| Selection::Subproject(sp.id)));
                }
            }
            None => self.collapsed.clear(),
            Some(sel) => {
                if !self.collapsed.remove(&sel) {
                    self.collapsed.insert(sel);
                }
            }
        }
    }

    /// Flip the show-done flag and return the new value.
    pub fn toggle_inactive_tasks(&mut self) -> bool {
        self.show_inactive_tasks = !self.show_inactive_tasks;
        self.show_inactive_tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Subproject;

    fn tree() -> Vec<Project> {
        let mut a = Project::new(1, "A");
        a.add_subproject(Subproject::new(2, 1, "A1"));
        a.add_subproject(Subproject::new(3, 1, "A2"));
        let mut b = Project::new(4, "B");
        b.add_subproject(Subproject::new(5, 4, "B1"));
        vec![a, b]
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let projects = tree();
        let mut view = ViewState::default();
        view.toggle_collapse(Some(Selection::Subproject(2)), &projects);
        assert!(view.collapsed.contains(&Selection::Subproject(2)));
        view.toggle_collapse(Some(Selection::Subproject(2)), &projects);
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn test_collapse_all_from_empty() {
        let projects = tree();
        let mut view = ViewState::default();
        view.toggle_collapse(None, &projects);
        assert_eq!(
            view.collapsed,
            BTreeSet::from([
                Selection::Project(1),
                Selection::Subproject(2),
                Selection::Subproject(3),
                Selection::Project(4),
                Selection::Subproject(5),
            ])
        );
    }

    #[test]
    fn test_collapse_all_with_partial_state_expands_everything() {
        let projects = tree();
        let mut view = ViewState::default();
        view.toggle_collapse(Some(Selection::Project(4)), &projects);
        view.toggle_collapse(None, &projects);
        assert!(view.collapsed.is_empty());
    }

    #[test]
    fn test_toggle_inactive_tasks() {
        let mut view = ViewState::default();
        assert!(view.toggle_inactive_tasks());
        assert!(!view.toggle_inactive_tasks());
    }
}
