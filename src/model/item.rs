// File: ./src/model/item.rs
use thiserror::Error;

/// Longest title the record format accepts, in characters.
pub const TITLE_MAX_LEN: usize = 149;

/// Characters the flat-record format cannot carry inside a field.
pub const FORBIDDEN_TITLE_CHARS: [char; 3] = [',', '\n', '\r'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("title must not be empty")]
    Empty,
    #[error("title is {0} characters long (max {max})", max = TITLE_MAX_LEN)]
    TooLong(usize),
    #[error("title must not contain {0:?}")]
    ForbiddenCharacter(char),
}

/// Checks that a title can be written to and read back from a record line.
pub fn validate_title(title: &str) -> Result<(), TitleError> {
    if title.trim().is_empty() {
        return Err(TitleError::Empty);
    }
    let len = title.chars().count();
    if len > TITLE_MAX_LEN {
        return Err(TitleError::TooLong(len));
    }
    if let Some(c) = title.chars().find(|c| FORBIDDEN_TITLE_CHARS.contains(c)) {
        return Err(TitleError::ForbiddenCharacter(c));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    /// `DD-MM-YYYY`, kept exactly as accepted.
    pub due_date: String,
    pub is_completed: bool,
}

impl Task {
    pub fn new(id: u32, title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            due_date: due_date.into(),
            is_completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl Summary {
    pub fn of(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, t| {
            acc.total += 1;
            if t.is_completed {
                acc.completed += 1;
            } else {
                acc.pending += 1;
            }
            acc
        })
    }
}
