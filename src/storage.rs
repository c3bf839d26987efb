// Reads and writes the flat-record task file.
//
// One task per line:
//
//     <id>,<title>,<DD-MM-YYYY>,<0|1>
//
// There is no header, no escaping and no checksum; end of file ends the list.
// Titles are kept comma-free by `model::validate_title`, which is the only
// thing that makes this format round-trip.
use crate::model::Task;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

pub const FIELD_SEPARATOR: char = ',';
const FIELD_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected {expected} fields, found {0}", expected = FIELD_COUNT)]
    FieldCount(usize),
    #[error("invalid task id '{0}'")]
    BadId(String),
    #[error("empty title")]
    EmptyTitle,
    #[error("invalid completion flag '{0}'")]
    BadFlag(String),
    #[error("line is not valid UTF-8")]
    NotUtf8,
}

/// What to do with a line that isn't a valid record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Log a warning and keep reading.
    #[default]
    SkipMalformed,
    /// Fail the whole load on the first bad line.
    Strict,
}

impl LoadMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::SkipMalformed }
    }
}

pub fn parse_record(line: &str) -> Result<Task, RecordError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(RecordError::FieldCount(fields.len()));
    }

    let id = fields[0]
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| RecordError::BadId(fields[0].to_string()))?;

    if fields[1].is_empty() {
        return Err(RecordError::EmptyTitle);
    }

    // Anything non-zero counts as completed.
    let flag = fields[3]
        .trim()
        .parse::<i64>()
        .map_err(|_| RecordError::BadFlag(fields[3].to_string()))?;

    Ok(Task {
        id,
        title: fields[1].to_string(),
        due_date: fields[2].to_string(),
        is_completed: flag != 0,
    })
}

pub fn format_record(task: &Task) -> String {
    format!(
        "{}{sep}{}{sep}{}{sep}{}",
        task.id,
        task.title,
        task.due_date,
        u8::from(task.is_completed),
        sep = FIELD_SEPARATOR
    )
}

/// Reads records until EOF. Blank lines are ignored in either mode.
///
/// Lines are split on raw bytes so that one undecodable line is handled like
/// any other malformed record instead of aborting the read.
pub fn read_records<R: BufRead>(mut reader: R, mode: LoadMode) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let record = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim_end_matches(['\n', '\r']);
                if line.trim().is_empty() {
                    continue;
                }
                parse_record(line)
            }
            Err(_) => Err(RecordError::NotUtf8),
        };
        match record {
            Ok(task) => tasks.push(task),
            Err(e) => match mode {
                LoadMode::Strict => {
                    return Err(anyhow::anyhow!("line {}: {}", line_no, e));
                }
                LoadMode::SkipMalformed => {
                    log::warn!("Skipping malformed record on line {}: {}", line_no, e);
                }
            },
        }
    }
    Ok(tasks)
}

pub fn write_records<W: Write>(tasks: &[Task], mut writer: W) -> io::Result<()> {
    for task in tasks {
        writeln!(writer, "{}", format_record(task))?;
    }
    writer.flush()
}

pub struct TaskFile;

impl TaskFile {
    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Loads every record in `path`. A missing file is an empty task list.
    pub fn load(path: &Path, mode: LoadMode) -> Result<Vec<Task>> {
        if !path.exists() {
            log::debug!("No task file at {}, starting empty", path.display());
            return Ok(vec![]);
        }
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open task file '{}'", path.display()))?;
        let tasks = read_records(BufReader::new(file), mode)
            .with_context(|| format!("Failed to read task file '{}'", path.display()))?;
        log::info!("Loaded {} tasks from {}", tasks.len(), path.display());
        Ok(tasks)
    }

    /// Rewrites `path` with exactly `tasks`, in order.
    pub fn save(path: &Path, tasks: &[Task]) -> io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let mut buf = Vec::new();
        write_records(tasks, &mut buf)?;
        Self::atomic_write(path, buf)?;
        log::debug!("Saved {} tasks to {}", tasks.len(), path.display());
        Ok(())
    }
}
