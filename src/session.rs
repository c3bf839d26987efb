// File: src/session.rs
//! The numbered menu loop.
//!
//! Input and output are generic so the whole dialogue can be driven from a
//! byte buffer. Validation lives in `date` and `model`; this module only
//! decides how often to ask again.
use crate::controller::{CommandError, TaskController};
use crate::date::validate_due_date;
use crate::model::validate_title;
use anyhow::Result;
use std::fmt::Display;
use std::io::{BufRead, Write};
use strum::{EnumIter, FromRepr, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, FromRepr, strum::Display)]
#[repr(u8)]
pub enum MenuChoice {
    #[strum(to_string = "Add Task")]
    Add = 1,
    #[strum(to_string = "View All Tasks")]
    View = 2,
    #[strum(to_string = "Edit Task")]
    Edit = 3,
    #[strum(to_string = "Delete Task")]
    Delete = 4,
    #[strum(to_string = "Mark Task as Completed")]
    Complete = 5,
    #[strum(to_string = "Daily Summary")]
    Summary = 6,
    #[strum(to_string = "Exit")]
    Exit = 7,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse::<u8>().ok().and_then(Self::from_repr)
    }
}

/// How many times a prompt may be answered before the command gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unlimited() -> Self {
        Self { max_attempts: None }
    }

    pub fn limited(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
        }
    }

    pub fn allows_another(&self, attempts_so_far: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts_so_far < max)
    }
}

enum Prompted<T> {
    Value(T),
    /// Retry budget used up.
    Exhausted,
    /// Input ended.
    Closed,
}

pub struct Session<R, W> {
    controller: TaskController,
    input: R,
    output: W,
    retry: RetryPolicy,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(controller: TaskController, input: R, output: W, retry: RetryPolicy) -> Self {
        Self {
            controller,
            input,
            output,
            retry,
        }
    }

    pub fn controller(&self) -> &TaskController {
        &self.controller
    }

    pub fn into_parts(self) -> (TaskController, W) {
        (self.controller, self.output)
    }

    /// Runs until Exit is chosen or input ends. Only I/O errors on the
    /// console itself escape.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                self.exit()?;
                return Ok(());
            };
            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => {
                    self.exit()?;
                    return Ok(());
                }
                Some(choice) => self.dispatch(choice)?,
                None => writeln!(self.output, "Invalid option!")?,
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<()> {
        log::debug!("Menu choice: {}", choice);
        match choice {
            MenuChoice::Add => self.add(),
            MenuChoice::View => {
                let text = self.controller.render_tasks();
                write!(self.output, "{}", text)?;
                Ok(())
            }
            MenuChoice::Edit => self.edit(),
            MenuChoice::Delete => self.delete(),
            MenuChoice::Complete => self.complete(),
            MenuChoice::Summary => {
                let text = self.controller.render_summary();
                write!(self.output, "{}", text)?;
                Ok(())
            }
            MenuChoice::Exit => self.exit(),
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n=========== PRODUCTIVITY TRACKER ===========")?;
        for choice in MenuChoice::iter() {
            writeln!(self.output, "{}. {}", choice as u8, choice)?;
        }
        write!(self.output, "Choose: ")?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt_until<T, E: Display>(
        &mut self,
        label: &str,
        validate: impl Fn(&str) -> Result<T, E>,
    ) -> Result<Prompted<T>> {
        let mut attempts = 0;
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(Prompted::Closed);
            };
            attempts += 1;
            match validate(&line) {
                Ok(value) => return Ok(Prompted::Value(value)),
                Err(e) => {
                    writeln!(self.output, "Invalid input: {}.", e)?;
                    if !self.retry.allows_another(attempts) {
                        writeln!(self.output, "Too many invalid attempts.")?;
                        return Ok(Prompted::Exhausted);
                    }
                    writeln!(self.output, "Try again.")?;
                }
            }
        }
    }

    /// Title then due date, each retried until valid. `None` means the
    /// command was abandoned and a message has been printed.
    fn prompt_title_and_date(&mut self, title_label: &str) -> Result<Option<(String, String)>> {
        let title = match self.prompt_until(title_label, |s| {
            let s = s.trim();
            validate_title(s).map(|_| s.to_string())
        })? {
            Prompted::Value(t) => t,
            other => return self.abandon(other),
        };

        let today = self.controller.today();
        let date = match self.prompt_until("Enter date (DD-MM-YYYY): ", |s| {
            let s = s.trim();
            validate_due_date(s, &today).map(|_| s.to_string())
        })? {
            Prompted::Value(d) => d,
            other => return self.abandon(other),
        };

        Ok(Some((title, date)))
    }

    fn abandon<T, U>(&mut self, why: Prompted<U>) -> Result<Option<T>> {
        match why {
            Prompted::Closed => writeln!(self.output, "\nInput closed; nothing changed.")?,
            _ => writeln!(self.output, "Nothing changed.")?,
        }
        Ok(None)
    }

    fn prompt_id(&mut self, label: &str) -> Result<Option<u32>> {
        let Some(line) = self.prompt(label)? else {
            return Ok(None);
        };
        match line.trim().parse::<u32>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Invalid ID.")?;
                Ok(None)
            }
        }
    }

    /// Prints the outcome of a mutating command.
    fn report<T>(&mut self, result: Result<T, CommandError>, success: &str) -> Result<()> {
        match result {
            Ok(_) => writeln!(self.output, "{}", success)?,
            Err(e) if e.is_not_found() => writeln!(self.output, "Task not found.")?,
            Err(e) if e.is_persist() => {
                writeln!(self.output, "{}", success)?;
                writeln!(self.output, "Warning: {}", e)?;
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        if self.controller.is_full() {
            let max = self.controller.store().options().max_tasks;
            writeln!(self.output, "Task list is full ({} tasks).", max)?;
            return Ok(());
        }
        let Some((title, date)) = self.prompt_title_and_date("Enter task title: ")? else {
            return Ok(());
        };
        let result = self.controller.add_task(&title, &date);
        self.report(result, "Task added successfully!")
    }

    fn edit(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id("Enter task ID to edit: ")? else {
            return Ok(());
        };
        if !self.controller.exists(id) {
            writeln!(self.output, "Task not found.")?;
            return Ok(());
        }
        let Some((title, date)) = self.prompt_title_and_date("New title: ")? else {
            return Ok(());
        };
        let result = self.controller.edit_task(id, &title, &date);
        self.report(result, "Task updated!")
    }

    fn delete(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id("Enter task ID to delete: ")? else {
            return Ok(());
        };
        let result = self.controller.delete_task(id);
        self.report(result, "Task deleted successfully!")
    }

    fn complete(&mut self) -> Result<()> {
        let Some(id) = self.prompt_id("Enter task ID to mark completed: ")? else {
            return Ok(());
        };
        let result = self.controller.complete_task(id);
        self.report(result, "Task marked as completed!")
    }

    fn exit(&mut self) -> Result<()> {
        match self.controller.flush() {
            Ok(()) => writeln!(self.output, "\nData saved. Exiting...")?,
            Err(e) => writeln!(self.output, "\nWarning: {}\nExiting...", e)?,
        }
        self.output.flush()?;
        Ok(())
    }
}
