// Drives the interactive menu end to end with scripted input.
use ptrack::context::{AppContext, TestContext};
use ptrack::controller::TaskController;
use ptrack::date::{CalendarDate, FixedClock};
use ptrack::model::Task;
use ptrack::session::{RetryPolicy, Session};
use ptrack::store::{StoreOptions, TaskStore};
use std::fs;
use std::io::Cursor;

fn today() -> FixedClock {
    FixedClock(CalendarDate::new(15, 6, 2024))
}

/// Runs the menu over `script` and returns the final store and the console output.
fn run_script(store: TaskStore, script: &str, retry: RetryPolicy) -> (TaskStore, String) {
    let controller = TaskController::new(store, today());
    let mut session = Session::new(controller, Cursor::new(script.to_string()), Vec::new(), retry);
    session.run().unwrap();
    let (controller, out) = session.into_parts();
    (controller.into_store(), String::from_utf8(out).unwrap())
}

fn empty_store() -> TaskStore {
    TaskStore::in_memory(StoreOptions::default())
}

#[test]
fn test_add_retries_until_date_is_valid() {
    let script = "1\nWrite report\n2024-06-20\n31-02-2025\n14-06-2024\n20-06-2024\n7\n";
    let (store, out) = run_script(empty_store(), script, RetryPolicy::unlimited());

    assert_eq!(store.len(), 1);
    let t = &store.tasks()[0];
    assert_eq!((t.id, t.title.as_str(), t.due_date.as_str()), (1, "Write report", "20-06-2024"));
    assert_eq!(out.matches("Try again.").count(), 3);
    assert!(out.contains("Task added successfully!"));
    assert!(out.contains("Data saved. Exiting..."));
}

#[test]
fn test_add_rejects_comma_in_title() {
    let script = "1\nmilk, eggs\nmilk and eggs\n16-06-2024\n7\n";
    let (store, out) = run_script(empty_store(), script, RetryPolicy::unlimited());

    assert_eq!(store.tasks()[0].title, "milk and eggs");
    assert!(out.contains("title must not contain ','"));
}

#[test]
fn test_retry_budget_abandons_command() {
    let script = "1\nReport\nnope\nstill nope\n7\n";
    let (store, out) = run_script(empty_store(), script, RetryPolicy::limited(2));

    assert!(store.is_empty());
    assert!(out.contains("Too many invalid attempts."));
    assert!(out.contains("Nothing changed."));
}

#[test]
fn test_view_marks_overdue_pending_tasks_only() {
    let mut done = Task::new(2, "Filed", "01-06-2024");
    done.is_completed = true;
    let store = TaskStore::from_tasks(
        vec![Task::new(1, "Taxes", "01-06-2024"), done, Task::new(3, "Trip", "15-06-2024")],
        None,
        StoreOptions::default(),
    );
    let (_, out) = run_script(store, "2\n7\n", RetryPolicy::unlimited());

    assert!(out.contains("ID: 1\nTitle: Taxes\nDate: 01-06-2024 OVERDUE!\nStatus: Pending\n"));
    assert!(out.contains("ID: 2\nTitle: Filed\nDate: 01-06-2024\nStatus: Completed\n"));
    assert!(out.contains("ID: 3\nTitle: Trip\nDate: 15-06-2024\nStatus: Pending\n"));
}

#[test]
fn test_view_empty() {
    let (_, out) = run_script(empty_store(), "2\n7\n", RetryPolicy::unlimited());
    assert!(out.contains("No tasks found."));
}

#[test]
fn test_edit_delete_complete_and_not_found() {
    let store = TaskStore::from_tasks(
        vec![
            Task::new(1, "a", "20-06-2024"),
            Task::new(2, "b", "21-06-2024"),
        ],
        None,
        StoreOptions::default(),
    );
    let script = concat!(
        "3\n9\n",                      // edit missing id
        "3\n2\nb edited\n30-06-2024\n", // edit id 2
        "5\n1\n",                      // complete id 1
        "4\n9\n",                      // delete missing id
        "4\n1\n",                      // delete id 1
        "6\n",                         // summary
        "7\n",
    );
    let (store, out) = run_script(store, script, RetryPolicy::unlimited());

    assert_eq!(out.matches("Task not found.").count(), 2);
    assert!(out.contains("Task updated!"));
    assert!(out.contains("Task marked as completed!"));
    assert!(out.contains("Task deleted successfully!"));
    assert!(out.contains("Total Tasks: 1\nCompleted : 0\nPending   : 1\n"));

    assert_eq!(store.len(), 1);
    let t = &store.tasks()[0];
    assert_eq!((t.id, t.title.as_str(), t.due_date.as_str()), (2, "b edited", "30-06-2024"));
}

#[test]
fn test_invalid_menu_choice_keeps_looping() {
    let (_, out) = run_script(empty_store(), "9\nabc\n6\n7\n", RetryPolicy::unlimited());
    assert_eq!(out.matches("Invalid option!").count(), 2);
    assert!(out.contains("Total Tasks: 0"));
    assert_eq!(out.matches("PRODUCTIVITY TRACKER").count(), 4);
}

#[test]
fn test_invalid_id_returns_to_menu() {
    let store = TaskStore::from_tasks(vec![Task::new(1, "a", "20-06-2024")], None, StoreOptions::default());
    let (store, out) = run_script(store, "4\none\n7\n", RetryPolicy::unlimited());
    assert!(out.contains("Invalid ID."));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let (store, out) = run_script(empty_store(), "1\nHalf typed\n", RetryPolicy::unlimited());
    assert!(store.is_empty());
    assert!(out.contains("Input closed; nothing changed."));
    assert!(out.contains("Data saved. Exiting..."));
}

#[test]
fn test_full_store_refuses_before_prompting() {
    let opts = StoreOptions {
        max_tasks: 1,
        ..Default::default()
    };
    let store = TaskStore::from_tasks(vec![Task::new(1, "a", "20-06-2024")], None, opts);
    let (store, out) = run_script(store, "1\n7\n", RetryPolicy::unlimited());
    assert!(out.contains("Task list is full (1 tasks)."));
    assert!(!out.contains("Enter task title:"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_save_failure_warns_after_success_line() {
    let ctx = TestContext::new();
    let path = ctx.get_task_file_path().unwrap();
    // A non-empty directory at the task path makes every save fail.
    fs::create_dir_all(path.join("blocker")).unwrap();

    let store = TaskStore::from_tasks(vec![], Some(path), StoreOptions::default());
    let (store, out) = run_script(store, "1\nWrite report\n20-06-2024\n7\n", RetryPolicy::unlimited());

    assert_eq!(store.len(), 1);
    assert!(
        out.contains("Task added successfully!\nWarning: could not save tasks to"),
        "{}",
        out
    );
    assert!(out.contains("Exiting..."));
    assert!(!out.contains("Data saved."));
}

#[test]
fn test_title_surrounding_whitespace_is_trimmed() {
    let script = "1\n   Padded title  \n20-06-2024\n7\n";
    let (store, _) = run_script(empty_store(), script, RetryPolicy::unlimited());
    assert_eq!(store.tasks()[0].title, "Padded title");
}
