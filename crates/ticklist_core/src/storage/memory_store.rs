//! In-memory backend holding the record lines a file would contain.

use super::record::{decode_lines, encode_record};
use super::{LoadedTasks, StorageResult, TaskStore};
use crate::model::task::Task;
use crate::model::task_list::TaskList;

/// Task store that keeps stored records in a `Vec<String>`.
///
/// Useful for embedders without a filesystem and for tests that need to
/// observe which persistence path a command took.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    lines: Vec<String>,
    appends: usize,
    overwrites: usize,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from raw record lines, as if read from a file.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn append_count(&self) -> usize {
        self.appends
    }

    pub fn overwrite_count(&self) -> usize {
        self.overwrites
    }
}

impl TaskStore for MemoryTaskStore {
    fn load(&mut self) -> StorageResult<LoadedTasks> {
        Ok(decode_lines(self.lines.iter().map(String::as_str)))
    }

    fn append(&mut self, task: &Task) -> StorageResult<()> {
        self.lines.push(encode_record(task));
        self.appends += 1;
        Ok(())
    }

    fn overwrite(&mut self, tasks: &TaskList) -> StorageResult<()> {
        self.lines = tasks.iter().map(encode_record).collect();
        self.overwrites += 1;
        Ok(())
    }
}
