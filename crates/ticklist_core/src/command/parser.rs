//! Line grammar.
//!
//! A line is a command word (case-insensitive) followed by free-form
//! context. Markers (`/by`, `/from`, `/to`) split the context into fields.

use super::datetime::{parse_date, parse_date_time};
use super::error::{CommandResult, FormatError, IndexError, InputError};
use super::Command;

const BY_MARKER: &str = "/by";
const FROM_MARKER: &str = "/from";
const TO_MARKER: &str = "/to";

/// Parses one input line.
///
/// # Errors
/// - [`InputError`] for empty input, unknown words, or blank required fields.
/// - [`IndexError::NotAnInteger`] for non-numeric task numbers.
/// - [`FormatError`] for bad dates and marker problems.
pub fn parse(line: &str) -> CommandResult<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputError::Empty.into());
    }

    let (word, context) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "bye" => no_arguments("bye", context).map(|()| Command::Bye),
        "list" => no_arguments("list", context).map(|()| Command::List),
        "mark" => task_index("mark", context).map(|index| Command::Mark { index }),
        "unmark" => task_index("unmark", context).map(|index| Command::Unmark { index }),
        "delete" => task_index("delete", context).map(|index| Command::Delete { index }),
        "todo" => parse_todo(context),
        "deadline" => parse_deadline(context),
        "event" => parse_event(context),
        "find" => parse_find(context),
        "schedule" => parse_schedule(context),
        "help" => Ok(Command::Help {
            topic: (!context.is_empty()).then(|| context.to_lowercase()),
        }),
        _ => Err(InputError::UnknownCommand(word.to_string()).into()),
    }
}

fn no_arguments(command: &'static str, context: &str) -> CommandResult<()> {
    if context.is_empty() {
        Ok(())
    } else {
        Err(InputError::UnexpectedArgument { command }.into())
    }
}

/// Converts a 1-based task number into a zero-based index.
fn task_index(command: &'static str, context: &str) -> CommandResult<i64> {
    if context.is_empty() {
        return Err(InputError::MissingArgument {
            command,
            what: "a task number",
        }
        .into());
    }
    let number: i64 = context
        .parse()
        .map_err(|_| IndexError::NotAnInteger(context.to_string()))?;
    Ok(number.saturating_sub(1))
}

fn parse_todo(context: &str) -> CommandResult<Command> {
    if context.is_empty() {
        return Err(InputError::MissingArgument {
            command: "todo",
            what: "a task name",
        }
        .into());
    }
    Ok(Command::Todo {
        name: context.to_string(),
    })
}

fn parse_deadline(context: &str) -> CommandResult<Command> {
    if context.is_empty() {
        return Err(InputError::MissingArgument {
            command: "deadline",
            what: "a task name",
        }
        .into());
    }
    let (name, when) = context
        .split_once(BY_MARKER)
        .ok_or(FormatError::MissingMarker {
            command: "deadline",
            marker: BY_MARKER,
        })?;
    let (name, when) = (name.trim(), when.trim());
    if name.is_empty() || when.is_empty() {
        return Err(InputError::MissingArgument {
            command: "deadline",
            what: "a name and a due date",
        }
        .into());
    }

    Ok(Command::Deadline {
        name: name.to_string(),
        due: parse_date_time(when)?,
    })
}

fn parse_event(context: &str) -> CommandResult<Command> {
    const COMMAND: &str = "event";

    if context.is_empty() {
        return Err(InputError::MissingArgument {
            command: COMMAND,
            what: "a task name",
        }
        .into());
    }
    let missing = |marker| FormatError::MissingMarker {
        command: COMMAND,
        marker,
    };
    let from_at = context.find(FROM_MARKER).ok_or_else(|| missing(FROM_MARKER))?;
    let to_at = context.find(TO_MARKER).ok_or_else(|| missing(TO_MARKER))?;
    if from_at > to_at {
        return Err(FormatError::MarkersOutOfOrder.into());
    }

    let name = &context[..from_at];
    let (start, end) = context[from_at + FROM_MARKER.len()..]
        .split_once(TO_MARKER)
        .ok_or_else(|| missing(TO_MARKER))?;
    let (name, start, end) = (name.trim(), start.trim(), end.trim());
    if name.is_empty() || start.is_empty() || end.is_empty() {
        return Err(InputError::MissingArgument {
            command: COMMAND,
            what: "a name, a start and an end",
        }
        .into());
    }

    let start = parse_date_time(start)?;
    let end = parse_date_time(end)?;
    if start > end {
        return Err(FormatError::StartAfterEnd.into());
    }
    Ok(Command::Event {
        name: name.to_string(),
        start,
        end,
    })
}

fn parse_find(context: &str) -> CommandResult<Command> {
    if context.is_empty() {
        return Err(InputError::MissingArgument {
            command: "find",
            what: "a keyword",
        }
        .into());
    }
    Ok(Command::Find {
        keyword: context.to_lowercase(),
    })
}

fn parse_schedule(context: &str) -> CommandResult<Command> {
    if context.is_empty() {
        return Err(InputError::MissingArgument {
            command: "schedule",
            what: "a date",
        }
        .into());
    }
    Ok(Command::Schedule {
        date: parse_date(context)?,
    })
}
