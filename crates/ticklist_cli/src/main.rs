//! Terminal front end for the tracker core.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the session.
//! - Feed stdin lines to the session and print each payload.
//!
//! Usage: `ticklist [config.json]`

use log::warn;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use ticklist_core::{init_logging, FileTaskStore, Response, Session, TaskStore, TrackerConfig};

const DEFAULT_CONFIG_FILE: &str = "ticklist.json";
const RULE: &str = "____________________________________________________________";

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = match TrackerConfig::from_file(&config_path) {
        Ok(config) => config.with_env_overrides(),
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &absolute(dir)) {
            eprintln!("logging disabled: {err}");
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(
        FileTaskStore::new(config.data_file),
        stdin.lock(),
        stdout.lock(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the read loop until `bye` or end of input.
fn run<S: TaskStore>(store: S, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
    let opened = Session::open(store);
    let mut session = opened.session;

    if let Some(err) = &opened.load_error {
        print_block(&mut out, &err.to_string(), Some("Starting with an empty, read-only list."))?;
    }
    if !opened.warnings.is_empty() {
        let lines: Vec<String> = opened
            .warnings
            .iter()
            .map(|warning| format!("Skipped corrupted {warning}"))
            .collect();
        print_block(&mut out, &lines.join("\n"), None)?;
    }
    print_block(
        &mut out,
        "Hello! What can I do for you?",
        Some("Type `help` to see all commands."),
    )?;

    for bytes in input.split(b'\n') {
        let line = String::from_utf8_lossy(&bytes?).into_owned();
        let response = match session.respond(&line) {
            Ok(response) => response,
            Err(err) => {
                warn!("event=command_failed module=cli error={err}");
                Response::from(err)
            }
        };
        print_block(&mut out, &response.message, response.annotation.as_deref())?;
        if response.exit {
            break;
        }
    }
    Ok(())
}

fn print_block(out: &mut impl Write, message: &str, annotation: Option<&str>) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "{message}")?;
    if let Some(annotation) = annotation {
        writeln!(out, "  ({annotation})")?;
    }
    writeln!(out, "{RULE}")?;
    out.flush()
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticklist_core::MemoryTaskStore;

    fn transcript(store: MemoryTaskStore, input: &str) -> String {
        transcript_bytes(store, input.as_bytes())
    }

    fn transcript_bytes(store: MemoryTaskStore, input: &[u8]) -> String {
        let mut out = Vec::new();
        run(store, input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn loop_stops_at_bye() {
        let text = transcript(MemoryTaskStore::new(), "todo a\nbye\ntodo b\n");
        assert!(text.contains("[T][ ] a"));
        assert!(text.contains("Bye."));
        assert!(!text.contains("[T][ ] b"));
    }

    #[test]
    fn errors_and_corruption_are_printed_not_fatal() {
        let store = MemoryTaskStore::with_lines(["X | 0 | odd"]);
        let text = transcript(store, "mark abc\nlist\n");
        assert!(text.contains("Skipped corrupted line 1"));
        assert!(text.contains("Task number `abc` is not an integer."));
        assert!(text.contains("Your task list is empty."));
    }

    #[test]
    fn non_utf8_input_line_does_not_end_the_session() {
        let text = transcript_bytes(MemoryTaskStore::new(), b"todo caf\xe9\ntodo tea\nlist\n");
        assert!(text.contains("[T][ ] caf\u{FFFD}"));
        assert!(text.contains("2. [T][ ] tea"));
    }
}
