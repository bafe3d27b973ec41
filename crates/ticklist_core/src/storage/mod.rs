//! Durable task persistence.
//!
//! # Responsibility
//! - Define the backend contract used by command execution.
//! - Convert between stored records and the in-memory task list.
//! - Report unparseable lines as warnings instead of failing the load.
//!
//! # Invariants
//! - A corrupted line never aborts the rest of a load.
//! - A failed write never touches the in-memory list.
//! - No file handle outlives a single store call.

use crate::model::task::Task;
use crate::model::task_list::TaskList;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod file_store;
mod memory_store;
pub mod record;

pub use file_store::FileTaskStore;
pub use memory_store::MemoryTaskStore;
pub use record::{CorruptedRecord, CorruptionReason};

pub type StorageResult<T> = Result<T, StorageError>;

/// Fatal persistence failure.
#[derive(Debug)]
pub enum StorageError {
    /// The data file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The data file (or its directory) could not be written.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Changes refused because the stored list was never loaded; saving
    /// would replace records nobody has read.
    Unloaded,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "couldn't load tasks from `{}`: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "couldn't save tasks to `{}`: {source}", path.display())
            }
            Self::Unloaded => write!(
                f,
                "changes are disabled because the saved tasks couldn't be loaded"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::Unloaded => None,
        }
    }
}

/// Result of a successful load.
#[derive(Debug, Default)]
pub struct LoadedTasks {
    pub tasks: TaskList,
    /// One entry per skipped line, in file order.
    pub warnings: Vec<CorruptedRecord>,
}

/// Persistence backend for one task list.
pub trait TaskStore {
    /// Reads every stored record.
    ///
    /// A missing backing file yields an empty list, not an error.
    fn load(&mut self) -> StorageResult<LoadedTasks>;

    /// Writes one record after all existing ones.
    fn append(&mut self, task: &Task) -> StorageResult<()>;

    /// Replaces all stored records with `tasks`, in list order.
    fn overwrite(&mut self, tasks: &TaskList) -> StorageResult<()>;
}
