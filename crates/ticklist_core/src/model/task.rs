//! Task domain model.
//!
//! # Responsibility
//! - Define the three task shapes (plain, deadline, timespan).
//! - Render each shape for display (the record form lives in the codec).
//! - Answer calendar-date and duplicate questions per shape.
//!
//! # Invariants
//! - `name` is trimmed, never empty, and holds no `|` or line break, so
//!   it always fits in one stored field.
//! - Timespan `start <= end` is enforced by the parser and the record
//!   codec, not by construction.
//!
//! # See also
//! - crate::storage::record

use chrono::{NaiveDate, NaiveDateTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEADLINE_DISPLAY_FORMAT: &str = "%a, %b %d %Y [%-I:%M%p]";
const EVENT_DISPLAY_FORMAT: &str = "%b %d %Y [%-I:%M%p]";
const RESERVED_NAME_CHARS: [char; 3] = ['|', '\n', '\r'];

/// Temporal shape of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// No date attached.
    Plain,
    /// Due at one point in time.
    Deadline { due: NaiveDateTime },
    /// Occupies the window `[start, end]`.
    Timespan {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl TaskKind {
    /// One-letter tag shared by display and storage forms.
    pub fn tag(&self) -> char {
        match self {
            Self::Plain => 'T',
            Self::Deadline { .. } => 'D',
            Self::Timespan { .. } => 'E',
        }
    }
}

/// Validation error for task construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyName,
    /// The name contains a field delimiter or a line break.
    ReservedCharacter(char),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "task name must not be empty"),
            Self::ReservedCharacter(ch) => {
                write!(f, "task name must not contain {}", ch.escape_default())
            }
        }
    }
}

impl Error for TaskValidationError {}

/// One trackable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    done: bool,
    kind: TaskKind,
}

impl Task {
    /// Creates a not-done task of the given shape.
    ///
    /// # Errors
    /// - Returns [`TaskValidationError::EmptyName`] when `name` is blank.
    /// - Returns [`TaskValidationError::ReservedCharacter`] when `name`
    ///   contains `|`, `\n` or `\r`.
    pub fn new(name: impl Into<String>, kind: TaskKind) -> Result<Self, TaskValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TaskValidationError::EmptyName);
        }
        if let Some(ch) = trimmed.chars().find(|ch| RESERVED_NAME_CHARS.contains(ch)) {
            return Err(TaskValidationError::ReservedCharacter(ch));
        }
        Ok(Self {
            name: trimmed.to_string(),
            done: false,
            kind,
        })
    }

    pub fn plain(name: impl Into<String>) -> Result<Self, TaskValidationError> {
        Self::new(name, TaskKind::Plain)
    }

    pub fn deadline(
        name: impl Into<String>,
        due: NaiveDateTime,
    ) -> Result<Self, TaskValidationError> {
        Self::new(name, TaskKind::Deadline { due })
    }

    pub fn timespan(
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, TaskValidationError> {
        Self::new(name, TaskKind::Timespan { start, end })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn mark_not_done(&mut self) {
        self.done = false;
    }

    /// Returns whether this task falls on `date`.
    ///
    /// - Plain tasks never match.
    /// - Deadlines match on their due date.
    /// - Timespans match any date in `[start date, end date]`.
    pub fn is_scheduled_on(&self, date: NaiveDate) -> bool {
        match self.kind {
            TaskKind::Plain => false,
            TaskKind::Deadline { due } => due.date() == date,
            TaskKind::Timespan { start, end } => start.date() <= date && date <= end.date(),
        }
    }

    /// Returns whether `other` is the same shape with the same name and times.
    ///
    /// The done flag is not compared.
    pub fn is_duplicate_of(&self, other: &Task) -> bool {
        self.name == other.name && self.kind == other.kind
    }

    /// Human-readable form, e.g. `[D][ ] Submit (BY: Sat, Aug 21 2021 [11:50PM])`.
    pub fn display_line(&self) -> String {
        let head = format!("[{}][{}] {}", self.kind.tag(), self.status_icon(), self.name);
        match self.kind {
            TaskKind::Plain => head,
            TaskKind::Deadline { due } => {
                format!("{head} (BY: {})", due.format(DEADLINE_DISPLAY_FORMAT))
            }
            TaskKind::Timespan { start, end } => format!(
                "{head} (FROM: {}  TO: {})",
                start.format(EVENT_DISPLAY_FORMAT),
                end.format(EVENT_DISPLAY_FORMAT)
            ),
        }
    }

    fn status_icon(&self) -> char {
        if self.done {
            'X'
        } else {
            ' '
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_line())
    }
}
