// File: src/store.rs
use crate::model::{Summary, Task, TitleError, validate_title};
use crate::storage::{LoadMode, TaskFile};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_TASKS: usize = 200;

/// How a new task gets its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// `id = number of tasks + 1`. After a delete this can hand out an id
    /// that is already taken; lookups then resolve to the first match.
    #[default]
    Length,
    /// One more than the highest id this store has seen (seeded from the file).
    Monotonic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub id_policy: IdPolicy,
    pub max_tasks: usize,
    pub load_mode: LoadMode,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            id_policy: IdPolicy::default(),
            max_tasks: DEFAULT_MAX_TASKS,
            load_mode: LoadMode::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(u32),
    #[error("task list is full ({0} tasks)")]
    Full(usize),
    #[error("invalid title: {0}")]
    InvalidTitle(#[from] TitleError),
    #[error("no task ids left to assign")]
    IdsExhausted,
    /// The in-memory change was applied; only writing it out failed.
    #[error("could not save tasks to '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn is_persist(&self) -> bool {
        matches!(self, Self::Persist { .. })
    }
}

/// Ordered task list backed by a flat-record file.
///
/// Every successful mutation rewrites the whole file before returning. A store
/// without a file (`in_memory`) skips that step.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    file: Option<PathBuf>,
    options: StoreOptions,
    next_id: u32,
}

impl TaskStore {
    pub fn in_memory(options: StoreOptions) -> Self {
        Self::from_tasks(Vec::new(), None, options)
    }

    /// Loads the store from `path` (a missing file is an empty store).
    pub fn open(path: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let path = path.into();
        let tasks = TaskFile::load(&path, options.load_mode)?;
        if tasks.len() > options.max_tasks {
            log::warn!(
                "{} holds {} tasks, above the limit of {}; new tasks will be refused",
                path.display(),
                tasks.len(),
                options.max_tasks
            );
        }
        Ok(Self::from_tasks(tasks, Some(path), options))
    }

    pub fn from_tasks(tasks: Vec<Task>, file: Option<PathBuf>, options: StoreOptions) -> Self {
        let next_id = tasks
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        Self {
            tasks,
            file,
            options,
            next_id,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Writes the current list out. Called after every mutation and on exit.
    pub fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        TaskFile::save(path, &self.tasks).map_err(|source| {
            log::error!("Failed to save {}: {}", path.display(), source);
            StoreError::Persist {
                path: path.clone(),
                source,
            }
        })
    }

    /// `u32::MAX` is never handed out, so `next_id` can always move past it.
    fn assign_id(&mut self) -> Result<u32, StoreError> {
        let id = match self.options.id_policy {
            IdPolicy::Length => u32::try_from(self.tasks.len())
                .ok()
                .and_then(|n| n.checked_add(1)),
            IdPolicy::Monotonic => Some(self.next_id),
        };
        let id = id.filter(|id| *id < u32::MAX).ok_or(StoreError::IdsExhausted)?;
        self.next_id = self.next_id.max(id + 1);
        Ok(id)
    }

    /// Appends a new pending task. The caller is responsible for having
    /// validated `due_date`.
    pub fn add(&mut self, title: &str, due_date: &str) -> Result<Task, StoreError> {
        validate_title(title)?;
        if self.tasks.len() >= self.options.max_tasks {
            return Err(StoreError::Full(self.options.max_tasks));
        }

        let task = Task::new(self.assign_id()?, title, due_date);
        log::debug!("Adding task {} ({})", task.id, task.title);
        self.tasks.push(task.clone());
        self.flush()?;
        Ok(task)
    }

    /// Index of the first task with `id`.
    pub fn find_by_id(&self, id: u32) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.find_by_id(id).ok().map(|idx| &self.tasks[idx])
    }

    pub fn edit(&mut self, id: u32, new_title: &str, new_due_date: &str) -> Result<(), StoreError> {
        let idx = self.find_by_id(id)?;
        validate_title(new_title)?;

        let task = &mut self.tasks[idx];
        task.title = new_title.to_string();
        task.due_date = new_due_date.to_string();
        log::debug!("Edited task {}", id);
        self.flush()
    }

    /// Removes the task and keeps the order of the rest.
    pub fn delete(&mut self, id: u32) -> Result<Task, StoreError> {
        let idx = self.find_by_id(id)?;
        let task = self.tasks.remove(idx);
        log::debug!("Deleted task {}", id);
        self.flush()?;
        Ok(task)
    }

    pub fn mark_completed(&mut self, id: u32) -> Result<(), StoreError> {
        let idx = self.find_by_id(id)?;
        self.tasks[idx].is_completed = true;
        log::debug!("Completed task {}", id);
        self.flush()
    }

    pub fn summarize(&self) -> Summary {
        Summary::of(&self.tasks)
    }
}
