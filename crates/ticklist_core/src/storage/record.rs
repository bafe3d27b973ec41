//! Stored record codec.
//!
//! One task per line, pipe-delimited:
//!
//! ```text
//! T | <0|1> | <name>
//! D | <0|1> | <name> | <YYYY-MM-DD HHMM>
//! E | <0|1> | <name> | <YYYY-MM-DD HHMM> | <YYYY-MM-DD HHMM>
//! ```
//!
//! # Invariants
//! - The record timestamp pattern is fixed and never shared with display
//!   rendering or user input.
//! - Each line decodes independently; a bad line yields a
//!   [`CorruptedRecord`] and decoding continues.

use super::LoadedTasks;
use crate::model::task::{Task, TaskKind, TaskValidationError};
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

const FIELD_SEPARATOR: &str = " | ";
const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H%M";

static RECORD_TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2}) (\d{2})(\d{2})$").expect("valid record timestamp regex")
});

/// Why a stored line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptionReason {
    /// Line bytes are not valid UTF-8.
    InvalidUtf8,
    /// Fewer than type, flag and name fields.
    TooFewFields,
    /// Done flag other than `0` or `1`.
    InvalidDoneFlag(String),
    UnknownTypeTag(String),
    /// Deadline or event line without its timestamp field(s).
    MissingTimestamp,
    InvalidTimestamp(String),
    EmptyName,
    /// Name holding `|` outside the field separators.
    ReservedCharacter(char),
    /// Event whose start is after its end.
    ReversedWindow,
}

impl Display for CorruptionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
            Self::TooFewFields => write!(f, "expected at least 3 fields"),
            Self::InvalidDoneFlag(flag) => write!(f, "done flag `{flag}` is not 0 or 1"),
            Self::UnknownTypeTag(tag) => write!(f, "unknown task type `{tag}`"),
            Self::MissingTimestamp => write!(f, "missing timestamp field"),
            Self::InvalidTimestamp(value) => {
                write!(f, "timestamp `{value}` does not match YYYY-MM-DD HHMM")
            }
            Self::EmptyName => write!(f, "task name is empty"),
            Self::ReservedCharacter(ch) => {
                write!(f, "task name contains `{}`", ch.escape_default())
            }
            Self::ReversedWindow => write!(f, "event starts after it ends"),
        }
    }
}

/// A stored line that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptedRecord {
    /// 1-based line number in the source.
    pub line_number: usize,
    /// Line text as read, trimmed.
    pub line: String,
    pub reason: CorruptionReason,
}

impl Display for CorruptedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: {} (skipped: `{}`)",
            self.line_number, self.reason, self.line
        )
    }
}

/// Renders `task` as one stored record, without a line break.
pub fn encode_record(task: &Task) -> String {
    let flag = if task.is_done() { "1" } else { "0" };
    let mut record = format!(
        "{}{FIELD_SEPARATOR}{flag}{FIELD_SEPARATOR}{}",
        task.kind().tag(),
        task.name()
    );
    match task.kind() {
        TaskKind::Plain => {}
        TaskKind::Deadline { due } => {
            record.push_str(FIELD_SEPARATOR);
            record.push_str(&format_timestamp(due));
        }
        TaskKind::Timespan { start, end } => {
            record.push_str(FIELD_SEPARATOR);
            record.push_str(&format_timestamp(start));
            record.push_str(FIELD_SEPARATOR);
            record.push_str(&format_timestamp(end));
        }
    }
    record
}

/// Decodes one trimmed, non-blank stored line.
///
/// Fields past the ones a task type needs are ignored.
pub fn decode_record(line: &str) -> Result<Task, CorruptionReason> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < 3 {
        return Err(CorruptionReason::TooFewFields);
    }

    let done = match fields[1] {
        "0" => false,
        "1" => true,
        other => return Err(CorruptionReason::InvalidDoneFlag(other.to_string())),
    };

    let kind = match fields[0] {
        "T" => TaskKind::Plain,
        "D" => {
            let due = timestamp_field(&fields, 3)?;
            TaskKind::Deadline { due }
        }
        "E" => {
            let start = timestamp_field(&fields, 3)?;
            let end = timestamp_field(&fields, 4)?;
            if start > end {
                return Err(CorruptionReason::ReversedWindow);
            }
            TaskKind::Timespan { start, end }
        }
        other => return Err(CorruptionReason::UnknownTypeTag(other.to_string())),
    };

    let mut task = Task::new(fields[2], kind).map_err(|err| match err {
        TaskValidationError::EmptyName => CorruptionReason::EmptyName,
        TaskValidationError::ReservedCharacter(ch) => CorruptionReason::ReservedCharacter(ch),
    })?;
    if done {
        task.mark_done();
    }
    Ok(task)
}

/// Decodes stored lines, skipping blank ones and collecting warnings.
pub fn decode_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> LoadedTasks {
    let mut loaded = LoadedTasks::default();
    for (index, raw) in lines.into_iter().enumerate() {
        decode_into(&mut loaded, index + 1, Ok(raw));
    }
    loaded
}

/// Decodes a raw file body one `\n`-terminated line at a time.
///
/// A line that is not valid UTF-8 becomes a [`CorruptionReason::InvalidUtf8`]
/// warning; its neighbours still decode.
pub fn decode_bytes(body: &[u8]) -> LoadedTasks {
    let mut loaded = LoadedTasks::default();
    for (index, raw) in body.split(|byte| *byte == b'\n').enumerate() {
        decode_into(&mut loaded, index + 1, std::str::from_utf8(raw).map_err(|_| raw));
    }
    loaded
}

fn decode_into(loaded: &mut LoadedTasks, line_number: usize, raw: Result<&str, &[u8]>) {
    let (line, decoded) = match raw {
        Ok(text) => {
            let line = text.trim();
            if line.is_empty() {
                return;
            }
            (line.to_string(), decode_record(line))
        }
        Err(bytes) => (
            String::from_utf8_lossy(bytes).trim().to_string(),
            Err(CorruptionReason::InvalidUtf8),
        ),
    };
    match decoded {
        Ok(task) => {
            loaded.tasks.add(task);
        }
        Err(reason) => loaded.warnings.push(CorruptedRecord {
            line_number,
            line,
            reason,
        }),
    }
}

/// Parses the fixed record timestamp pattern `YYYY-MM-DD HHMM`.
///
/// Stricter than [`NaiveDateTime::parse_from_str`]: every component must be
/// zero-padded to its full width.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let caps = RECORD_TIMESTAMP_RE.captures(value)?;
    let number = |i: usize| caps[i].parse::<u32>().ok();
    let year = caps[1].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, number(2)?, number(3)?)?.and_hms_opt(number(4)?, number(5)?, 0)
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(RECORD_TIMESTAMP_FORMAT).to_string()
}

fn timestamp_field(fields: &[&str], index: usize) -> Result<NaiveDateTime, CorruptionReason> {
    let raw = fields
        .get(index)
        .ok_or(CorruptionReason::MissingTimestamp)?;
    parse_timestamp(raw).ok_or_else(|| CorruptionReason::InvalidTimestamp(raw.to_string()))
}
