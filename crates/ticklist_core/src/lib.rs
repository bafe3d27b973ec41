//! Core logic for the ticklist task tracker.
//! Command grammar, task model, execution and the stored-record file format.

pub mod command;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use command::{parse, Command, CommandError, CommandResult, FormatError, IndexError, InputError};
pub use config::{ConfigError, TrackerConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{Task, TaskKind, TaskValidationError};
pub use model::task_list::TaskList;
pub use service::executor::{execute, Response};
pub use service::session::{OpenedSession, Session};
pub use storage::{
    CorruptedRecord, CorruptionReason, FileTaskStore, LoadedTasks, MemoryTaskStore, StorageError,
    StorageResult, TaskStore,
};
