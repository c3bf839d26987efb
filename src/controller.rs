// File: src/controller.rs
//! Task operations shared by the interactive menu and the one-shot CLI
//! commands.
//!
//! The controller owns the store and a clock. Each operation that accepts a due
//! date re-checks it against "today" before touching the store, so no caller
//! can slip a past or malformed date in.
use crate::date::{CalendarDate, Clock, DateError, validate_due_date};
use crate::model::Task;
use crate::model::display::{render_summary, render_task_list};
use crate::model::item::Summary;
use crate::store::{StoreError, TaskStore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Date(#[from] DateError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CommandError {
    /// True when the change is in memory but could not be written out.
    pub fn is_persist(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_persist())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound(_)))
    }
}

pub struct TaskController {
    store: TaskStore,
    clock: Box<dyn Clock>,
}

impl TaskController {
    pub fn new(store: TaskStore, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn into_store(self) -> TaskStore {
        self.store
    }

    pub fn today(&self) -> CalendarDate {
        self.clock.today()
    }

    pub fn is_full(&self) -> bool {
        self.store.len() >= self.store.options().max_tasks
    }

    pub fn exists(&self, id: u32) -> bool {
        self.store.find_by_id(id).is_ok()
    }

    pub fn add_task(&mut self, title: &str, due_date: &str) -> Result<Task, CommandError> {
        validate_due_date(due_date, &self.today())?;
        Ok(self.store.add(title, due_date)?)
    }

    pub fn edit_task(&mut self, id: u32, title: &str, due_date: &str) -> Result<(), CommandError> {
        self.store.find_by_id(id)?;
        validate_due_date(due_date, &self.today())?;
        Ok(self.store.edit(id, title, due_date)?)
    }

    pub fn delete_task(&mut self, id: u32) -> Result<Task, CommandError> {
        Ok(self.store.delete(id)?)
    }

    pub fn complete_task(&mut self, id: u32) -> Result<(), CommandError> {
        Ok(self.store.mark_completed(id)?)
    }

    pub fn summary(&self) -> Summary {
        self.store.summarize()
    }

    pub fn render_tasks(&self) -> String {
        render_task_list(self.store.tasks(), &self.today())
    }

    pub fn render_summary(&self) -> String {
        render_summary(&self.summary())
    }

    pub fn flush(&self) -> Result<(), CommandError> {
        Ok(self.store.flush()?)
    }
}
