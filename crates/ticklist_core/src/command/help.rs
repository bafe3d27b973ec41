//! Command catalogue used by `help` and by usage hints on errors.

/// Description of one command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpEntry {
    pub command: &'static str,
    pub summary: &'static str,
    pub usage: &'static str,
}

const CATALOGUE: &[HelpEntry] = &[
    HelpEntry {
        command: "todo",
        summary: "Add a task without a date.",
        usage: "todo <name>",
    },
    HelpEntry {
        command: "deadline",
        summary: "Add a task due at a date and optional time, e.g. 21/8/2021 1800.",
        usage: "deadline <name> /by <date[ time]>",
    },
    HelpEntry {
        command: "event",
        summary: "Add an event spanning two dates with optional times.",
        usage: "event <name> /from <date[ time]> /to <date[ time]>",
    },
    HelpEntry {
        command: "list",
        summary: "Show every task.",
        usage: "list",
    },
    HelpEntry {
        command: "mark",
        summary: "Mark a task as done.",
        usage: "mark <task number>",
    },
    HelpEntry {
        command: "unmark",
        summary: "Mark a task as not done.",
        usage: "unmark <task number>",
    },
    HelpEntry {
        command: "delete",
        summary: "Remove a task.",
        usage: "delete <task number>",
    },
    HelpEntry {
        command: "find",
        summary: "Show tasks whose name contains a keyword, ignoring case.",
        usage: "find <keyword>",
    },
    HelpEntry {
        command: "schedule",
        summary: "Show deadlines and events falling on a date, e.g. 21/8/2021.",
        usage: "schedule <date>",
    },
    HelpEntry {
        command: "help",
        summary: "Show all commands, or one command in detail.",
        usage: "help [command]",
    },
    HelpEntry {
        command: "bye",
        summary: "End the session.",
        usage: "bye",
    },
];

/// Every entry, in presentation order.
pub fn all() -> &'static [HelpEntry] {
    CATALOGUE
}

/// Looks up one command word, ignoring case.
pub fn lookup(command: &str) -> Option<&'static HelpEntry> {
    CATALOGUE
        .iter()
        .find(|entry| entry.command.eq_ignore_ascii_case(command))
}

pub(crate) fn usage_hint(command: &str) -> Option<String> {
    lookup(command).map(|entry| format!("Usage: {}", entry.usage))
}
