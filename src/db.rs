//! Persistence for projects and schedules.
//!
//! The tracker only talks to the `Store` trait. `JsonStore` keeps everything in a
//! single JSON document on disk; each upload rewrites the file atomically and
//! leaves the other half of the document untouched.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::project::Project;
use crate::schedule::Schedule;

/// Synchronous object store the tracker persists through.
pub trait Store {
    /// Load every project.
    fn download_projects(&self) -> Result<Vec<Project>, StoreError>;
    /// Replace the stored project list.
    fn upload_projects(&mut self, projects: &[Project]) -> Result<(), StoreError>;
    /// Load every schedule, oldest first.
    fn download_schedules(&self) -> Result<Vec<Schedule>, StoreError>;
    /// Replace the stored schedule list.
    fn upload_schedules(&mut self, schedules: &[Schedule]) -> Result<(), StoreError>;
}

/// On-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

impl Database {
    /// Load the database from a JSON file. A missing file is an empty database.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Database::default());
        }
        let buf = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&buf).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the database using an atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// `Store` backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Store backed by the JSON file at `path`.
    pub fn new(path: &Path) -> Self {
        JsonStore {
            path: path.to_path_buf(),
        }
    }
}

impl Store for JsonStore {
    fn download_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(Database::load(&self.path)?.projects)
    }

    fn upload_projects(&mut self, projects: &[Project]) -> Result<(), StoreError> {
        let mut db = Database::load(&self.path)?;
        db.projects = projects.to_vec();
        db.save(&self.path)?;
        debug!(path = %self.path.display(), count = projects.len(), "uploaded projects");
        Ok(())
    }

    fn download_schedules(&self) -> Result<Vec<Schedule>, StoreError> {
        Ok(Database::load(&self.path)?.schedules)
    }

    fn upload_schedules(&mut self, schedules: &[Schedule]) -> Result<(), StoreError> {
        let mut db = Database::load(&self.path)?;
        db.schedules = schedules.to_vec();
        db.save(&self.path)?;
        debug!(path = %self.path.display(), count = schedules.len(), "uploaded schedules");
        Ok(())
    }
}

/// In-memory store for unit tests, counting uploads.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub projects: Vec<Project>,
    pub schedules: Vec<Schedule>,
    pub uploads: usize,
}

#[cfg(test)]
impl Store for MemoryStore {
    fn download_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.clone())
    }

    fn upload_projects(&mut self, projects: &[Project]) -> Result<(), StoreError> {
        self.projects = projects.to_vec();
        self.uploads += 1;
        Ok(())
    }

    fn download_schedules(&self) -> Result<Vec<Schedule>, StoreError> {
        Ok(self.schedules.clone())
    }

    fn upload_schedules(&mut self, schedules: &[Schedule]) -> Result<(), StoreError> {
        self.schedules = schedules.to_vec();
        Ok(())
    }
}

/// Store for unit tests whose uploads always fail.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct FailingStore {
    pub projects: Vec<Project>,
}

#[cfg(test)]
impl Store for FailingStore {
    fn download_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.clone())
    }

    fn upload_projects(&mut self, _projects: &[Project]) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn download_schedules(&self) -> Result<Vec<Schedule>, StoreError> {
        Ok(Vec::new())
    }

    fn upload_schedules(&mut self, _schedules: &[Schedule]) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }
}
