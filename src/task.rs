//! Task data structure.
//!
//! A task is the leaf of the project tree: a unit of work with an effort
//! estimate, the effort spent so far, a completion flag and a due date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A unit of work owned by exactly one subproject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub expected: i64,
    #[serde(default)]
    pub spent: i64,
    #[serde(default)]
    pub done: bool,
    pub due: NaiveDate,
}

impl Task {
    /// Create a task.
    pub fn new(id: u64, text: &str, expected: i64, spent: i64, done: bool, due: NaiveDate) -> Self {
        Task {
            id,
            text: text.to_string(),
            expected,
            spent,
            done,
            due,
        }
    }

    /// Whether the task is finished.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Flip the completion flag and return the new value.
    pub fn toggle_done(&mut self) -> bool {
        self.done = !self.done;
        self.done
    }
}

/// Parameters for a new task, collected and validated before the task exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub expected: i64,
    pub spent: i64,
    pub done: bool,
    pub due: NaiveDate,
}

impl NewTask {
    /// Turn the request into a stored task with the given id.
    pub fn into_task(self, id: u64) -> Task {
        Task::new(id, &self.name, self.expected, self.spent, self.done, self.due)
    }
}
