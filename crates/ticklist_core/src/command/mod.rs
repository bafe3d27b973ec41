//! Typed commands and the grammar that produces them.
//!
//! # Responsibility
//! - Turn one raw input line into a [`Command`] or a [`CommandError`].
//! - Own the user-facing date/time grammar and the command catalogue.
//!
//! # Invariants
//! - Parsing never performs I/O.
//! - Every rejected line maps to exactly one error kind.

use chrono::{NaiveDate, NaiveDateTime};

pub mod datetime;
pub mod error;
pub mod help;
mod parser;

pub use error::{CommandError, CommandResult, FormatError, IndexError, InputError};
pub use help::HelpEntry;
pub use parser::parse;

/// One validated user instruction.
///
/// Task indices are zero-based and may be negative or past the end; range
/// checks happen at execution against the live list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bye,
    List,
    Mark { index: i64 },
    Unmark { index: i64 },
    Delete { index: i64 },
    Todo { name: String },
    Deadline { name: String, due: NaiveDateTime },
    Event {
        name: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// `keyword` is already lower-cased.
    Find { keyword: String },
    Schedule { date: NaiveDate },
    /// `topic` is already lower-cased.
    Help { topic: Option<String> },
}

impl Command {
    /// Command word, for logs.
    pub fn word(&self) -> &'static str {
        match self {
            Self::Bye => "bye",
            Self::List => "list",
            Self::Mark { .. } => "mark",
            Self::Unmark { .. } => "unmark",
            Self::Delete { .. } => "delete",
            Self::Todo { .. } => "todo",
            Self::Deadline { .. } => "deadline",
            Self::Event { .. } => "event",
            Self::Find { .. } => "find",
            Self::Schedule { .. } => "schedule",
            Self::Help { .. } => "help",
        }
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Bye)
    }

    /// Whether executing this command writes to storage.
    pub fn changes_tasks(&self) -> bool {
        matches!(
            self,
            Self::Mark { .. }
                | Self::Unmark { .. }
                | Self::Delete { .. }
                | Self::Todo { .. }
                | Self::Deadline { .. }
                | Self::Event { .. }
        )
    }
}
