//! One running tracker session.
//!
//! # Responsibility
//! - Load the task list once at startup.
//! - Turn each input line into a response payload.
//!
//! # Invariants
//! - One line is parsed, executed and persisted before the next is accepted.
//! - Bad input never ends the session; only `bye` sets `exit`.
//! - A session whose load failed never writes to its store.

use super::executor::{execute, Response};
use crate::command::{parse, CommandResult};
use crate::model::task_list::TaskList;
use crate::storage::{CorruptedRecord, StorageError, TaskStore};
use log::{error, info, warn};

/// Live task list paired with its persistence backend.
pub struct Session<S: TaskStore> {
    tasks: TaskList,
    store: S,
    read_only: bool,
}

/// Outcome of [`Session::open`].
pub struct OpenedSession<S: TaskStore> {
    pub session: Session<S>,
    /// Lines skipped during load, for a one-time startup notice.
    pub warnings: Vec<CorruptedRecord>,
    /// Set when the data file exists but could not be read; the session
    /// then starts empty and read-only.
    pub load_error: Option<StorageError>,
}

impl<S: TaskStore> Session<S> {
    /// Loads the stored list and starts a session over `store`.
    pub fn open(mut store: S) -> OpenedSession<S> {
        let (tasks, warnings, load_error) = match store.load() {
            Ok(loaded) => (loaded.tasks, loaded.warnings, None),
            Err(err) => {
                error!("event=session_open module=service status=error error={err}");
                (TaskList::new(), Vec::new(), Some(err))
            }
        };
        info!(
            "event=session_open module=service status=ok tasks={} skipped={}",
            tasks.len(),
            warnings.len()
        );
        OpenedSession {
            session: Self {
                tasks,
                store,
                read_only: load_error.is_some(),
            },
            warnings,
            load_error,
        }
    }

    /// Parses and executes one input line.
    ///
    /// # Errors
    /// - [`StorageError::Unloaded`] for commands that change tasks when the
    ///   session opened read-only.
    pub fn respond(&mut self, line: &str) -> CommandResult<Response> {
        let command = parse(line)?;
        if self.read_only && command.changes_tasks() {
            warn!(
                "event=command_refused module=service command={} reason=unloaded",
                command.word()
            );
            return Err(StorageError::Unloaded.into());
        }
        execute(command, &mut self.tasks, &mut self.store)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandError, InputError};
    use crate::model::task::Task;
    use crate::storage::{LoadedTasks, MemoryTaskStore, StorageResult};
    use std::path::PathBuf;

    /// Fails every load and counts attempted writes.
    #[derive(Default)]
    struct UnreadableStore {
        writes: usize,
    }

    impl TaskStore for UnreadableStore {
        fn load(&mut self) -> StorageResult<LoadedTasks> {
            Err(StorageError::Read {
                path: PathBuf::from("tasks.txt"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn append(&mut self, _task: &Task) -> StorageResult<()> {
            self.writes += 1;
            Ok(())
        }

        fn overwrite(&mut self, _tasks: &TaskList) -> StorageResult<()> {
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn open_reports_corrupted_lines_and_keeps_the_rest() {
        let store = MemoryTaskStore::with_lines(["T | 0 | keep", "T | 9 | drop", "T | 1 | also"]);
        let opened = Session::open(store);

        assert!(opened.load_error.is_none());
        assert_eq!(opened.session.tasks().len(), 2);
        assert_eq!(opened.warnings.len(), 1);
        assert_eq!(opened.warnings[0].line_number, 2);
    }

    #[test]
    fn bad_input_keeps_session_usable() {
        let mut session = Session::open(MemoryTaskStore::new()).session;

        assert!(matches!(
            session.respond(""),
            Err(CommandError::Input(InputError::Empty))
        ));
        let response = session.respond("todo read book").unwrap();
        assert!(!response.exit);
        assert_eq!(session.tasks().len(), 1);
        assert_eq!(session.store().lines(), ["T | 0 | read book"]);
    }

    #[test]
    fn failed_load_opens_read_only_and_never_writes() {
        let opened = Session::open(UnreadableStore::default());
        assert!(matches!(opened.load_error, Some(StorageError::Read { .. })));
        let mut session = opened.session;
        assert!(session.is_read_only());

        for line in ["todo new", "mark 1", "delete 1"] {
            assert!(
                matches!(
                    session.respond(line),
                    Err(CommandError::Storage(StorageError::Unloaded))
                ),
                "line: {line}"
            );
        }
        assert_eq!(
            session.respond("list").unwrap().message,
            "Your task list is empty."
        );
        assert!(session.respond("bye").unwrap().exit);
        assert!(session.tasks().is_empty());
        assert_eq!(session.store().writes, 0);
    }
}
