//! The tracker controller.
//!
//! `Tracker` owns the project list, the store it came from and the UI-only
//! view state. Every mutation persists the whole project list; callers rebuild
//! their rows from `rows()` afterwards.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::db::Store;
use crate::error::{ActionError, StoreError};
use crate::flatten;
use crate::project::{find_project, next_id, Project, Subproject};
use crate::schedule::{Schedule, ScheduleEntry};
use crate::selection::{self, Entity, Selection};
use crate::task::NewTask;
use crate::view::ViewState;

/// A validated user request, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateProject {
        name: String,
    },
    CreateSubproject {
        target: Option<Selection>,
        name: String,
    },
    CreateTask {
        target: Option<Selection>,
        task: NewTask,
    },
    Rename {
        target: Option<Selection>,
        name: String,
    },
}

/// Projects, the store they persist to and the view state.
pub struct Tracker<S: Store> {
    store: S,
    projects: Vec<Project>,
    view: ViewState,
}

impl<S: Store> Tracker<S> {
    /// Load the projects from the store.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let projects = store.download_projects()?;
        info!(projects = projects.len(), "loaded projects");
        Ok(Tracker {
            store,
            projects,
            view: ViewState::default(),
        })
    }

    /// All projects, in display order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Collapsed nodes and the show-done flag.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current list rows, rebuilt from scratch.
    pub fn rows(&self) -> Vec<(Selection, String)> {
        flatten::rows(&self.projects, &self.view.collapsed, self.view.show_inactive_tasks)
    }

    pub fn lookup(&self, selection: Selection) -> Option<Entity<'_>> {
        selection::lookup(&self.projects, selection)
    }

    /// Check that the target is a project before asking the user anything.
    pub fn require_project(&self, target: Option<Selection>) -> Result<u64, ActionError> {
        match target {
            Some(Selection::Project(id)) => Ok(id),
            _ => Err(ActionError::NotAProject),
        }
    }

    /// Check that the target is a subproject before asking the user anything.
    pub fn require_subproject(&self, target: Option<Selection>) -> Result<u64, ActionError> {
        match target {
            Some(Selection::Subproject(id)) => Ok(id),
            _ => Err(ActionError::NotASubproject),
        }
    }

    /// Apply a request, returning the selection it created or changed.
    pub fn apply(&mut self, request: Request) -> Result<Selection, ActionError> {
        match request {
            Request::CreateProject { name } => Ok(self.create_project(&name)?),
            Request::CreateSubproject { target, name } => self.create_subproject(target, &name),
            Request::CreateTask { target, task } => self.create_task(target, task),
            Request::Rename { target, name } => self.rename(target, &name),
        }
    }

    pub fn create_project(&mut self, name: &str) -> Result<Selection, StoreError> {
        let id = next_id(&self.projects);
        self.projects.push(Project::new(id, name));
        self.save_changes()?;
        info!(id, name, "created project");
        Ok(Selection::Project(id))
    }

    pub fn create_subproject(
        &mut self,
        target: Option<Selection>,
        name: &str,
    ) -> Result<Selection, ActionError> {
        let project_id = self.require_project(target).inspect_err(|_| {
            warn!(?target, "subproject needs a project selected");
        })?;
        let id = next_id(&self.projects);
        let project = selection::project_mut(&mut self.projects, project_id).ok_or(ActionError::NothingSelected)?;
        project.add_subproject(Subproject::new(id, project_id, name));
        self.save_changes()?;
        info!(id, project = project_id, name, "created subproject");
        Ok(Selection::Subproject(id))
    }

    pub fn create_task(&mut self, target: Option<Selection>, task: NewTask) -> Result<Selection, ActionError> {
        let subproject_id = self.require_subproject(target).inspect_err(|_| {
            warn!(?target, "task needs a subproject selected");
        })?;
        let id = next_id(&self.projects);
        let subproject =
            selection::subproject_mut(&mut self.projects, subproject_id).ok_or(ActionError::NothingSelected)?;
        info!(id, subproject = subproject_id, name = %task.name, "created task");
        subproject.add_task(task.into_task(id));
        self.save_changes()?;
        Ok(Selection::Task(id))
    }

    /// Rename whichever kind of node is selected.
    pub fn rename(&mut self, target: Option<Selection>, new_name: &str) -> Result<Selection, ActionError> {
        let target = target.ok_or(ActionError::NothingSelected)?;
        let name = match target {
            Selection::Project(id) => selection::project_mut(&mut self.projects, id).map(|p| &mut p.name),
            Selection::Subproject(id) => selection::subproject_mut(&mut self.projects, id).map(|s| &mut s.name),
            Selection::Task(id) => selection::task_mut(&mut self.projects, id).map(|t| &mut t.text),
        };
        let name = name.ok_or(ActionError::NothingSelected)?;
        *name = new_name.to_string();
        self.save_changes()?;
        info!(?target, new_name, "renamed");
        Ok(target)
    }

    /// Flip a task's done flag. Returns `None` without touching the store when
    /// the selection is not a task.
    pub fn toggle_done(&mut self, target: Option<Selection>) -> Result<Option<bool>, StoreError> {
        let Some(Selection::Task(id)) = target else {
            return Ok(None);
        };
        let Some(task) = selection::task_mut(&mut self.projects, id) else {
            return Ok(None);
        };
        let done = task.toggle_done();
        self.save_changes()?;
        info!(id, done, "toggled done");
        Ok(Some(done))
    }

    pub fn toggle_collapse(&mut self, item: Option<Selection>) {
        self.view.toggle_collapse(item, &self.projects);
        debug!(?item, collapsed = self.view.collapsed.len(), "toggled collapse");
    }

    pub fn toggle_inactive_tasks(&mut self) -> bool {
        let show = self.view.toggle_inactive_tasks();
        debug!(show, "toggled inactive tasks");
        show
    }

    /// The most recent schedule, if the store has any.
    pub fn latest_schedule(&self) -> Result<Option<Schedule>, StoreError> {
        Ok(self.store.download_schedules()?.pop())
    }

    /// Add an entry to the latest schedule, starting a new one when there is none.
    pub fn plan(&mut self, entry: ScheduleEntry) -> Result<(), StoreError> {
        let mut schedules = self.store.download_schedules()?;
        if schedules.is_empty() {
            schedules.push(Schedule::new());
        }
        if let Some(latest) = schedules.last_mut() {
            latest.entries.push(entry);
            latest.created_at_utc = Utc::now().timestamp();
        }
        self.store.upload_schedules(&schedules)?;
        info!("updated schedule");
        Ok(())
    }

    /// Resolve `project[/subproject[/task]]` names to a selection.
    pub fn find(&self, project: &str, subproject: Option<&str>, task: Option<&str>) -> Result<Selection, ActionError> {
        let not_found = |kind, name: &str| ActionError::NotFound {
            kind,
            name: name.to_string(),
        };
        let p = find_project(&self.projects, project).ok_or_else(|| not_found("project", project))?;
        let Some(sp_name) = subproject else {
            return Ok(Selection::Project(p.id));
        };
        let sp = p.find_subproject(sp_name).ok_or_else(|| not_found("subproject", sp_name))?;
        let Some(task_name) = task else {
            return Ok(Selection::Subproject(sp.id));
        };
        let t = sp.find_task(task_name).ok_or_else(|| not_found("task", task_name))?;
        Ok(Selection::Task(t.id))
    }

    fn save_changes(&mut self) -> Result<(), StoreError> {
        self.store.upload_projects(&self.projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FailingStore, MemoryStore};
    use chrono::NaiveDate;

    fn new_task(name: &str) -> NewTask {
        NewTask {
            name: name.to_string(),
            expected: 3,
            spent: 0,
            done: false,
            due: NaiveDate::from_ymd_opt(2024, 3, 28).unwrap(),
        }
    }

    fn tracker() -> Tracker<MemoryStore> {
        Tracker::open(MemoryStore::default()).unwrap()
    }

    #[test]
    fn test_create_project_in_empty_store() {
        let mut t = tracker();
        let sel = t.create_project("Health").unwrap();

        assert_eq!(t.store().projects.len(), 1);
        assert_eq!(t.store().projects[0].name, "Health");
        assert!(t.store().projects[0].subprojects.is_empty());
        assert_eq!(t.rows(), vec![(sel, "Health".to_string())]);
    }

    #[test]
    fn test_subproject_requires_project_selection() {
        let mut t = tracker();
        let p = t.create_project("Health").unwrap();
        let sp = t.create_subproject(Some(p), "Running").unwrap();
        let uploads = t.store().uploads;

        let err = t.create_subproject(Some(sp), "Nested").unwrap_err();
        assert!(matches!(err, ActionError::NotAProject));
        assert_eq!(err.to_string(), " Must select a project!");
        assert!(t.create_subproject(None, "Nested").is_err());
        assert_eq!(t.store().uploads, uploads);
    }

    #[test]
    fn test_task_requires_subproject_selection() {
        let mut t = tracker();
        let p = t.create_project("Health").unwrap();
        let err = t.create_task(Some(p), new_task("Intervals")).unwrap_err();
        assert_eq!(err.to_string(), " Must select a subproject!");

        let sp = t.create_subproject(Some(p), "Running").unwrap();
        let task = t.create_task(Some(sp), new_task("Intervals")).unwrap();
        assert_eq!(t.lookup(task).map(|e| e.name().to_string()), Some("Intervals".into()));
        assert_eq!(t.store().projects[0].subprojects[0].tasks.len(), 1);
    }

    #[test]
    fn test_rename_each_kind() {
        let mut t = tracker();
        let p = t.create_project("Health").unwrap();
        let sp = t.create_subproject(Some(p), "Running").unwrap();
        let task = t.create_task(Some(sp), new_task("Intervals")).unwrap();

        t.rename(Some(p), "Fitness").unwrap();
        t.rename(Some(sp), "Cycling").unwrap();
        t.rename(Some(task), "Hill repeats").unwrap();

        let stored = &t.store().projects[0];
        assert_eq!(stored.name, "Fitness");
        assert_eq!(stored.subprojects[0].name, "Cycling");
        assert_eq!(stored.subprojects[0].tasks[0].text, "Hill repeats");
        assert!(matches!(t.rename(None, "x"), Err(ActionError::NothingSelected)));
    }

    #[test]
    fn test_toggle_done_twice_restores_state() {
        let mut t = tracker();
        let p = t.create_project("Health").unwrap();
        let sp = t.create_subproject(Some(p), "Running").unwrap();
        let task = t.create_task(Some(sp), new_task("Intervals")).unwrap();

        assert_eq!(t.toggle_done(Some(task)).unwrap(), Some(true));
        assert_eq!(t.toggle_done(Some(task)).unwrap(), Some(false));
        assert!(!t.store().projects[0].subprojects[0].tasks[0].done);
    }

    #[test]
    fn test_toggle_done_on_non_task_does_not_persist() {
        let mut t = tracker();
        let p = t.create_project("Health").unwrap();
        let uploads = t.store().uploads;

        assert_eq!(t.toggle_done(Some(p)).unwrap(), None);
        assert_eq!(t.toggle_done(None).unwrap(), None);
        assert_eq!(t.store().uploads, uploads);
    }

    #[test]
    fn test_done_tasks_leave_rows_until_filter_toggled() {
        let mut t = tracker();
        let p = t.create_project("Health").unwrap();
        let sp = t.create_subproject(Some(p), "Running").unwrap();
        let task = t.create_task(Some(sp), new_task("Intervals")).unwrap();
        assert_eq!(t.rows().len(), 3);

        t.toggle_done(Some(task)).unwrap();
        assert_eq!(t.rows().len(), 2);

        assert!(t.toggle_inactive_tasks());
        assert_eq!(t.rows().len(), 3);
        assert!(t.rows()[2].1.contains("[x] Intervals"));
    }

    #[test]
    fn test_collapse_all_then_expand_all() {
        let mut t = tracker();
        let p = t.create_project("Health").unwrap();
        t.create_subproject(Some(p), "Running").unwrap();
        t.create_project("Work").unwrap();

        t.toggle_collapse(None);
        assert_eq!(t.view().collapsed.len(), 3);
        assert_eq!(t.rows().len(), 2);

        t.toggle_collapse(None);
        assert!(t.view().collapsed.is_empty());
        assert_eq!(t.rows().len(), 3);
    }

    #[test]
    fn test_apply_requests() {
        let mut t = tracker();
        let p = t.apply(Request::CreateProject { name: "Health".into() }).unwrap();
        let sp = t
            .apply(Request::CreateSubproject {
                target: Some(p),
                name: "Running".into(),
            })
            .unwrap();
        t.apply(Request::CreateTask {
            target: Some(sp),
            task: new_task("Intervals"),
        })
        .unwrap();
        assert_eq!(t.find("health", Some("running"), Some("intervals")).unwrap(), Selection::Task(3));
        assert!(matches!(
            t.find("Health", Some("Cycling"), None),
            Err(ActionError::NotFound { kind: "subproject", .. })
        ));
    }

    #[test]
    fn test_plan_appends_to_latest_schedule() {
        let mut t = tracker();
        assert_eq!(t.latest_schedule().unwrap(), None);

        t.plan(ScheduleEntry::new(1, 9, "Health", "Running").unwrap()).unwrap();
        t.plan(ScheduleEntry::new(2, 10, "Work", "Reports").unwrap()).unwrap();

        assert_eq!(t.store().schedules.len(), 1);
        assert_eq!(t.latest_schedule().unwrap().unwrap().entries.len(), 2);
    }

    #[test]
    fn test_store_failure_is_not_recoverable() {
        let store = FailingStore {
            projects: vec![Project::new(1, "Health")],
        };
        let mut t = Tracker::open(store).unwrap();

        let err = t
            .apply(Request::CreateSubproject {
                target: Some(Selection::Project(1)),
                name: "Running".into(),
            })
            .unwrap_err();
        assert!(matches!(err, ActionError::Store(StoreError::Io(_))));
        assert!(t.plan(ScheduleEntry::new(1, 9, "Health", "Running").unwrap()).is_err());
    }
}
