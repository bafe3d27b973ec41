//! Line-oriented file backend.
//!
//! # Responsibility
//! - Read and write stored records at a caller-supplied path.
//! - Create the containing directory on demand.
//!
//! # Invariants
//! - Every call opens its own handle and drops it before returning.
//! - `append` never rewrites existing content; it only restores a missing
//!   final line break so the new record starts on its own line.

use super::record::{decode_bytes, encode_record};
use super::{LoadedTasks, StorageError, StorageResult, TaskStore};
use crate::logging::sanitize_message;
use crate::model::task::Task;
use crate::model::task_list::TaskList;
use log::{error, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

const MAX_LOGGED_LINE_CHARS: usize = 120;

/// Task store backed by one UTF-8 text file.
#[derive(Debug, Clone)]
pub struct FileTaskStore {
    path: PathBuf,
}

impl FileTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> std::io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }

    fn write_error(&self, source: std::io::Error) -> StorageError {
        error!(
            "event=task_save module=storage status=error path={} error={}",
            self.path.display(),
            source
        );
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl TaskStore for FileTaskStore {
    fn load(&mut self) -> StorageResult<LoadedTasks> {
        let started_at = Instant::now();
        if let Err(err) = self.ensure_parent_dir() {
            warn!(
                "event=task_load module=storage status=warn path={} error_code=mkdir_failed error={}",
                self.path.display(),
                err
            );
        }

        let body = match fs::read(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=task_load module=storage status=ok path={} loaded=0 skipped=0 missing_file=true",
                    self.path.display()
                );
                return Ok(LoadedTasks::default());
            }
            Err(source) => {
                error!(
                    "event=task_load module=storage status=error path={} error={}",
                    self.path.display(),
                    source
                );
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let loaded = decode_bytes(&body);
        for warning in &loaded.warnings {
            warn!(
                "event=record_skipped module=storage line={} reason=\"{}\" text=\"{}\"",
                warning.line_number,
                warning.reason,
                sanitize_message(&warning.line, MAX_LOGGED_LINE_CHARS)
            );
        }
        info!(
            "event=task_load module=storage status=ok path={} loaded={} skipped={} duration_ms={}",
            self.path.display(),
            loaded.tasks.len(),
            loaded.warnings.len(),
            started_at.elapsed().as_millis()
        );
        Ok(loaded)
    }

    fn append(&mut self, task: &Task) -> StorageResult<()> {
        self.ensure_parent_dir()
            .map_err(|err| self.write_error(err))?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| self.write_error(err))?;
        let mut line = String::new();
        if lacks_final_line_break(&mut file).map_err(|err| self.write_error(err))? {
            line.push('\n');
        }
        line.push_str(&encode_record(task));
        line.push('\n');
        file.write_all(line.as_bytes()).map_err(|err| self.write_error(err))?;

        info!(
            "event=task_append module=storage status=ok path={}",
            self.path.display()
        );
        Ok(())
    }

    fn overwrite(&mut self, tasks: &TaskList) -> StorageResult<()> {
        self.ensure_parent_dir()
            .map_err(|err| self.write_error(err))?;

        let mut body = String::new();
        for task in tasks {
            body.push_str(&encode_record(task));
            body.push('\n');
        }
        fs::write(&self.path, body).map_err(|err| self.write_error(err))?;

        info!(
            "event=task_overwrite module=storage status=ok path={} count={}",
            self.path.display(),
            tasks.len()
        );
        Ok(())
    }
}

/// True when `file` is non-empty and its last byte is not `\n`.
fn lacks_final_line_break(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
