//! Command execution against a task list and a store.
//!
//! # Responsibility
//! - Apply one parsed command to the live task list.
//! - Choose the persistence path: append for inserts, overwrite for
//!   index mutations, nothing for queries.
//! - Build the presentation payload.
//!
//! # Invariants
//! - Index checks run in order: empty list, below range, above range.
//! - A failed save rolls the in-memory change back before returning.

use crate::command::{help, Command, CommandError, CommandResult, IndexError, InputError};
use crate::model::task::{Task, TaskValidationError};
use crate::model::task_list::TaskList;
use crate::storage::TaskStore;
use chrono::NaiveDate;
use log::{debug, warn};

const ALL_DONE_NOTE: &str = "Every task is complete!";

/// Presentation payload for one successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub message: String,
    /// Optional secondary line.
    pub annotation: Option<String>,
    /// Set by `bye`; the caller should end the session.
    pub exit: bool,
}

impl Response {
    fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            annotation: None,
            exit: false,
        }
    }
}

/// Executes `command`, mutating `tasks` and persisting through `store`.
pub fn execute<S: TaskStore + ?Sized>(
    command: Command,
    tasks: &mut TaskList,
    store: &mut S,
) -> CommandResult<Response> {
    let word = command.word();
    debug!("event=command_execute module=service command={word}");

    let result = match command {
        Command::Bye => Ok(Response {
            message: "Bye. Your tasks are saved; see you soon!".to_string(),
            annotation: None,
            exit: true,
        }),
        Command::List => Ok(list(tasks)),
        Command::Mark { index } => set_done(tasks, store, index, true),
        Command::Unmark { index } => set_done(tasks, store, index, false),
        Command::Delete { index } => delete(tasks, store, index),
        Command::Todo { name } => insert(tasks, store, word, Task::plain(name)),
        Command::Deadline { name, due } => insert(tasks, store, word, Task::deadline(name, due)),
        Command::Event { name, start, end } => {
            insert(tasks, store, word, Task::timespan(name, start, end))
        }
        Command::Find { keyword } => Ok(find(tasks, &keyword)),
        Command::Schedule { date } => Ok(schedule(tasks, date)),
        Command::Help { topic } => show_help(topic.as_deref()),
    };

    if let Err(err) = &result {
        warn!("event=command_execute module=service status=error command={word} error={err}");
    }
    result
}

/// Validates a zero-based index against the live list.
fn resolve_index(
    tasks: &TaskList,
    index: i64,
    command: &'static str,
) -> Result<usize, IndexError> {
    if tasks.is_empty() {
        return Err(IndexError::EmptyList { command });
    }
    if index < 0 {
        return Err(IndexError::BelowRange);
    }
    match usize::try_from(index) {
        Ok(position) if position < tasks.len() => Ok(position),
        _ => Err(IndexError::AboveRange {
            number: index.saturating_add(1),
            size: tasks.len(),
        }),
    }
}

fn set_done<S: TaskStore + ?Sized>(
    tasks: &mut TaskList,
    store: &mut S,
    index: i64,
    done: bool,
) -> CommandResult<Response> {
    let position = resolve_index(tasks, index, if done { "mark" } else { "unmark" })?;
    let Some(task) = tasks.get_mut(position) else {
        return Err(IndexError::BelowRange.into());
    };
    let was_done = task.is_done();
    apply_done(task, done);

    if let Err(err) = store.overwrite(tasks) {
        if let Some(task) = tasks.get_mut(position) {
            apply_done(task, was_done);
        }
        return Err(err.into());
    }

    let line = tasks
        .get(position)
        .map(Task::display_line)
        .unwrap_or_default();
    if done {
        Ok(Response {
            message: format!("Nice! I've marked this task as done:\n  {line}"),
            annotation: tasks.is_all_marked().then(|| ALL_DONE_NOTE.to_string()),
            exit: false,
        })
    } else {
        Ok(Response::text(format!(
            "OK, I've marked this task as not done yet:\n  {line}"
        )))
    }
}

fn apply_done(task: &mut Task, done: bool) {
    if done {
        task.mark_done();
    } else {
        task.mark_not_done();
    }
}

fn delete<S: TaskStore + ?Sized>(
    tasks: &mut TaskList,
    store: &mut S,
    index: i64,
) -> CommandResult<Response> {
    let position = resolve_index(tasks, index, "delete")?;
    let Some(removed) = tasks.delete(position) else {
        return Err(IndexError::BelowRange.into());
    };

    if let Err(err) = store.overwrite(tasks) {
        tasks.insert(position, removed);
        return Err(err.into());
    }

    Ok(Response::text(format!(
        "Noted. I've removed this task:\n  {}\n{}",
        removed.display_line(),
        count_line(tasks.len())
    )))
}

fn insert<S: TaskStore + ?Sized>(
    tasks: &mut TaskList,
    store: &mut S,
    command: &'static str,
    task: Result<Task, TaskValidationError>,
) -> CommandResult<Response> {
    let task = task.map_err(|err| match err {
        TaskValidationError::EmptyName => InputError::MissingArgument {
            command,
            what: "a task name",
        },
        TaskValidationError::ReservedCharacter(ch) => InputError::ReservedCharacter(ch),
    })?;
    store.append(&task)?;

    let line = tasks.add(task).display_line();
    Ok(Response::text(format!(
        "Got it. I've added this task:\n  {line}\n{}",
        count_line(tasks.len())
    )))
}

fn list(tasks: &TaskList) -> Response {
    if tasks.is_empty() {
        return Response::text("Your task list is empty.");
    }
    Response::text(format!(
        "Here are the tasks in your list:\n{}",
        numbered(tasks.iter())
    ))
}

fn find(tasks: &TaskList, keyword: &str) -> Response {
    let matches = tasks.find(keyword);
    if matches.is_empty() {
        return Response::text(format!("No tasks match \"{keyword}\"."));
    }
    Response::text(format!(
        "Here are the matching tasks in your list:\n{}",
        numbered(matches)
    ))
}

fn schedule(tasks: &TaskList, date: NaiveDate) -> Response {
    let day = date.format("%b %d %Y");
    let matches = tasks.scheduled_on(date);
    if matches.is_empty() {
        return Response::text(format!("Nothing is scheduled on {day}."));
    }
    Response::text(format!(
        "Here is what's scheduled on {day}:\n{}",
        numbered(matches)
    ))
}

fn show_help(topic: Option<&str>) -> CommandResult<Response> {
    let entries = match topic {
        None => help::all().iter().collect::<Vec<_>>(),
        Some(word) => vec![help::lookup(word)
            .ok_or_else(|| InputError::UnknownHelpTopic(word.to_string()))?],
    };
    let body = entries
        .iter()
        .map(|entry| format!("{}\n    {}", entry.usage, entry.summary))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Response::text(body))
}

fn numbered<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
    tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| format!("{}. {}", i + 1, task.display_line()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn count_line(count: usize) -> String {
    let noun = if count == 1 { "task" } else { "tasks" };
    format!("Now you have {count} {noun} in the list.")
}

impl From<CommandError> for Response {
    fn from(err: CommandError) -> Self {
        Self {
            message: err.message(),
            annotation: err.annotation(),
            exit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LoadedTasks, MemoryTaskStore, StorageError, StorageResult};
    use std::path::PathBuf;

    struct ReadOnlyStore;

    impl ReadOnlyStore {
        fn denied() -> StorageError {
            StorageError::Write {
                path: PathBuf::from("tasks.txt"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            }
        }
    }

    impl TaskStore for ReadOnlyStore {
        fn load(&mut self) -> StorageResult<LoadedTasks> {
            Ok(LoadedTasks::default())
        }

        fn append(&mut self, _task: &Task) -> StorageResult<()> {
            Err(Self::denied())
        }

        fn overwrite(&mut self, _tasks: &TaskList) -> StorageResult<()> {
            Err(Self::denied())
        }
    }

    fn run(line: &str, tasks: &mut TaskList, store: &mut MemoryTaskStore) -> CommandResult<Response> {
        execute(crate::command::parse(line)?, tasks, store)
    }

    fn seeded(names: &[&str]) -> (TaskList, MemoryTaskStore) {
        let mut tasks = TaskList::new();
        let mut store = MemoryTaskStore::new();
        for name in names {
            run(&format!("todo {name}"), &mut tasks, &mut store).unwrap();
        }
        (tasks, store)
    }

    #[test]
    fn insert_appends_and_reports_count() {
        let (mut tasks, mut store) = seeded(&[]);

        let response = run("deadline Submit /by 21/8/2021 2350", &mut tasks, &mut store).unwrap();
        assert_eq!(
            response.message,
            "Got it. I've added this task:\n  [D][ ] Submit (BY: Sat, Aug 21 2021 [11:50PM])\nNow you have 1 task in the list."
        );
        assert_eq!(store.lines(), ["D | 0 | Submit | 2021-08-21 2350"]);
        assert_eq!(store.append_count(), 1);
        assert_eq!(store.overwrite_count(), 0);
    }

    #[test]
    fn mark_overwrites_and_flags_all_complete() {
        let (mut tasks, mut store) = seeded(&["a", "b"]);

        let first = run("mark 1", &mut tasks, &mut store).unwrap();
        assert!(first.message.ends_with("[T][X] a"));
        assert_eq!(first.annotation, None);

        let second = run("mark 2", &mut tasks, &mut store).unwrap();
        assert_eq!(second.annotation.as_deref(), Some(ALL_DONE_NOTE));
        assert_eq!(store.overwrite_count(), 2);
        assert_eq!(store.lines(), ["T | 1 | a", "T | 1 | b"]);
    }

    #[test]
    fn index_checks_run_in_order() {
        let (mut empty, mut store) = seeded(&[]);
        assert!(matches!(
            run("delete 1", &mut empty, &mut store),
            Err(CommandError::Index(IndexError::EmptyList { command: "delete" }))
        ));

        let (mut tasks, mut store) = seeded(&["a", "b", "c"]);
        assert!(matches!(
            run("unmark 0", &mut tasks, &mut store),
            Err(CommandError::Index(IndexError::BelowRange))
        ));
        assert!(matches!(
            run("mark 99", &mut tasks, &mut store),
            Err(CommandError::Index(IndexError::AboveRange { number: 99, size: 3 }))
        ));
        assert_eq!(store.overwrite_count(), 0);
    }

    #[test]
    fn queries_never_touch_storage() {
        let (mut tasks, mut store) = seeded(&["Team meeting", "Dentist"]);
        let appends = store.append_count();

        for line in ["list", "find MEET", "schedule 1/1/2024", "help", "help todo"] {
            run(line, &mut tasks, &mut store).unwrap();
        }
        assert_eq!(store.append_count(), appends);
        assert_eq!(store.overwrite_count(), 0);
    }

    #[test]
    fn find_and_schedule_number_their_results() {
        let (mut tasks, mut store) = seeded(&["Team meeting", "Dentist"]);
        run("event Trip /from 20/8/2021 /to 22/8/2021 1800", &mut tasks, &mut store).unwrap();

        let found = run("find meeting", &mut tasks, &mut store).unwrap();
        assert_eq!(
            found.message,
            "Here are the matching tasks in your list:\n1. [T][ ] Team meeting"
        );

        let day = run("schedule 21/8/2021", &mut tasks, &mut store).unwrap();
        assert_eq!(
            day.message,
            "Here is what's scheduled on Aug 21 2021:\n1. [E][ ] Trip (FROM: Aug 20 2021 [12:00AM]  TO: Aug 22 2021 [6:00PM])"
        );

        let none = run("schedule 1/1/2030", &mut tasks, &mut store).unwrap();
        assert_eq!(none.message, "Nothing is scheduled on Jan 01 2030.");
    }

    #[test]
    fn help_for_unknown_topic_is_an_input_error() {
        let (mut tasks, mut store) = seeded(&[]);
        assert!(matches!(
            run("help snooze", &mut tasks, &mut store),
            Err(CommandError::Input(InputError::UnknownHelpTopic(word))) if word == "snooze"
        ));
        let one = run("help BYE", &mut tasks, &mut store).unwrap();
        assert_eq!(one.message, "bye\n    End the session.");
    }

    #[test]
    fn bye_signals_exit() {
        let (mut tasks, mut store) = seeded(&[]);
        assert!(run("bye", &mut tasks, &mut store).unwrap().exit);
    }

    #[test]
    fn error_converts_to_payload_with_annotation() {
        let err = crate::command::parse("mark abc").unwrap_err();
        let payload = Response::from(err);
        assert_eq!(payload.message, "Task number `abc` is not an integer.");
        assert_eq!(
            payload.annotation.as_deref(),
            Some("Type `list` to see task numbers.")
        );
    }

    #[test]
    fn insert_rejects_names_that_would_split_a_record() {
        let (mut tasks, mut store) = seeded(&[]);

        for line in [
            "todo pay bills | rent",
            "deadline report | draft /by 21/8/2021 2350",
            "event a|b /from 1/1/2024 /to 2/1/2024",
            "todo first\nsecond",
        ] {
            assert!(
                matches!(
                    run(line, &mut tasks, &mut store),
                    Err(CommandError::Input(InputError::ReservedCharacter(_)))
                ),
                "line: {line:?}"
            );
        }
        assert!(tasks.is_empty());
        assert_eq!(store.append_count(), 0);
    }

    #[test]
    fn failed_saves_leave_the_list_unchanged() {
        let (mut tasks, _) = seeded(&["a", "b"]);
        let before = tasks.clone();
        let mut store = ReadOnlyStore;

        for line in ["todo c", "mark 1", "delete 2"] {
            let command = crate::command::parse(line).unwrap();
            assert!(matches!(
                execute(command, &mut tasks, &mut store),
                Err(CommandError::Storage(StorageError::Write { .. }))
            ));
            assert_eq!(tasks, before, "after `{line}`");
        }
    }
}
