//! Command error kinds.
//!
//! Each error renders a primary message through `Display` and may carry a
//! secondary annotation for the presentation layer.

use super::help;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CommandResult<T> = Result<T, CommandError>;

const DATE_TIME_HINT: &str = "Use D/M/YYYY or D/M/YYYY HHMM, e.g. 21/8/2021 or 21/8/2021 1800.";
const DATE_HINT: &str = "Use D/M/YYYY, e.g. 21/8/2021.";
const LIST_HINT: &str = "Type `list` to see task numbers.";
const HELP_HINT: &str = "Type `help` to see all commands.";

/// Malformed or incomplete input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Empty,
    UnknownCommand(String),
    /// A command that takes no arguments received some.
    UnexpectedArgument { command: &'static str },
    /// A required field is blank.
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    UnknownHelpTopic(String),
    /// Task names can't hold `|` or line breaks.
    ReservedCharacter(char),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Input required. Type a command to get started."),
            Self::UnknownCommand(word) => write!(f, "Unknown command `{word}`."),
            Self::UnexpectedArgument { command } => {
                write!(f, "The `{command}` command doesn't take any arguments.")
            }
            Self::MissingArgument { command, what } => {
                write!(f, "The `{command}` command needs {what}.")
            }
            Self::UnknownHelpTopic(word) => write!(f, "`{word}` is not a command I know."),
            Self::ReservedCharacter(ch) => write!(
                f,
                "Task names can't contain `{}`.",
                ch.escape_default()
            ),
        }
    }
}

impl InputError {
    pub fn annotation(&self) -> Option<String> {
        match self {
            Self::Empty | Self::UnknownCommand(_) | Self::UnknownHelpTopic(_) => {
                Some(HELP_HINT.to_string())
            }
            Self::UnexpectedArgument { command } | Self::MissingArgument { command, .. } => {
                help::usage_hint(command)
            }
            Self::ReservedCharacter(_) => {
                Some("Use another separator, such as `-` or `;`.".to_string())
            }
        }
    }
}

/// Task-number problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    NotAnInteger(String),
    EmptyList { command: &'static str },
    /// Task numbers start at 1.
    BelowRange,
    /// `number` is 1-based; `size` is the list length.
    AboveRange { number: i64, size: usize },
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnInteger(raw) => write!(f, "Task number `{raw}` is not an integer."),
            Self::EmptyList { command } => {
                write!(f, "There are no tasks to {command}; your list is empty.")
            }
            Self::BelowRange => write!(f, "Task numbers start from 1."),
            Self::AboveRange { number, size } => write!(
                f,
                "There is no task {number}; your list has {size} {}.",
                if *size == 1 { "task" } else { "tasks" }
            ),
        }
    }
}

impl IndexError {
    pub fn annotation(&self) -> Option<String> {
        match self {
            Self::EmptyList { .. } => Some("Add one with `todo`, `deadline` or `event`.".to_string()),
            Self::NotAnInteger(_) | Self::BelowRange | Self::AboveRange { .. } => {
                Some(LIST_HINT.to_string())
            }
        }
    }
}

/// Date/time tokens and marker layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    InvalidDateTime(String),
    InvalidDate(String),
    MissingMarker {
        command: &'static str,
        marker: &'static str,
    },
    /// `/to` appears before `/from`.
    MarkersOutOfOrder,
    StartAfterEnd,
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateTime(token) => write!(f, "`{token}` is not a date/time I understand."),
            Self::InvalidDate(token) => write!(f, "`{token}` is not a date I understand."),
            Self::MissingMarker { command, marker } => {
                write!(f, "The `{command}` command needs `{marker}`.")
            }
            Self::MarkersOutOfOrder => write!(f, "`/from` has to come before `/to`."),
            Self::StartAfterEnd => write!(f, "An event can't end before it starts."),
        }
    }
}

impl FormatError {
    pub fn annotation(&self) -> Option<String> {
        match self {
            Self::InvalidDateTime(_) => Some(DATE_TIME_HINT.to_string()),
            Self::InvalidDate(_) => Some(DATE_HINT.to_string()),
            Self::MissingMarker { command, .. } => help::usage_hint(command),
            Self::MarkersOutOfOrder => help::usage_hint("event"),
            Self::StartAfterEnd => None,
        }
    }
}

/// Any failure while parsing or executing one input line.
#[derive(Debug)]
pub enum CommandError {
    Input(InputError),
    Index(IndexError),
    Format(FormatError),
    Storage(StorageError),
}

impl CommandError {
    /// Primary user-facing text.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Optional secondary line.
    pub fn annotation(&self) -> Option<String> {
        match self {
            Self::Input(err) => err.annotation(),
            Self::Index(err) => err.annotation(),
            Self::Format(err) => err.annotation(),
            Self::Storage(StorageError::Unloaded) => {
                Some("Fix or move the data file, then restart.".to_string())
            }
            Self::Storage(_) => Some("Nothing was changed; please try again.".to_string()),
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(err) => write!(f, "{err}"),
            Self::Index(err) => write!(f, "{err}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InputError {}
impl Error for IndexError {}
impl Error for FormatError {}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::Index(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<InputError> for CommandError {
    fn from(value: InputError) -> Self {
        Self::Input(value)
    }
}

impl From<IndexError> for CommandError {
    fn from(value: IndexError) -> Self {
        Self::Index(value)
    }
}

impl From<FormatError> for CommandError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<StorageError> for CommandError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
