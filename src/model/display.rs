// File: ./src/model/display.rs
use crate::date::{CalendarDate, parse_date};
use crate::model::item::{Summary, Task};
use std::fmt::Write;

pub const OVERDUE_MARKER: &str = "OVERDUE!";

pub trait TaskDisplay {
    fn is_overdue(&self, today: &CalendarDate) -> bool;
    fn status_label(&self) -> &'static str;
    fn render(&self, today: &CalendarDate) -> String;
}

impl TaskDisplay for Task {
    /// Stored dates are not re-validated on load, so an unreadable one is
    /// simply never overdue.
    fn is_overdue(&self, today: &CalendarDate) -> bool {
        if self.is_completed {
            return false;
        }
        parse_date(&self.due_date)
            .map(|d| d.is_past(today))
            .unwrap_or(false)
    }

    fn status_label(&self) -> &'static str {
        if self.is_completed {
            "Completed"
        } else {
            "Pending"
        }
    }

    fn render(&self, today: &CalendarDate) -> String {
        let mut s = format!(
            "ID: {}\nTitle: {}\nDate: {}",
            self.id, self.title, self.due_date
        );
        if self.is_overdue(today) {
            s.push(' ');
            s.push_str(OVERDUE_MARKER);
        }
        let _ = write!(s, "\nStatus: {}\n", self.status_label());
        s
    }
}

pub fn render_task_list(tasks: &[Task], today: &CalendarDate) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }
    let mut out = String::from("\n--------- TASK LIST ---------\n");
    for task in tasks {
        out.push_str(&task.render(today));
        out.push('\n');
    }
    out
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "\n------ DAILY SUMMARY ------\nTotal Tasks: {}\nCompleted : {}\nPending   : {}\n",
        summary.total, summary.completed, summary.pending
    )
}
