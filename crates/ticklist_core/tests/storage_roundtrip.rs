use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use tempfile::TempDir;
use ticklist_core::{CorruptionReason, FileTaskStore, Task, TaskKind, TaskList, TaskStore};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn sample_list() -> TaskList {
    let mut tasks = TaskList::new();
    tasks.add(Task::plain("read book").unwrap());
    let mut deadline = Task::deadline("Submit", at(2021, 8, 21, 23, 50)).unwrap();
    deadline.mark_done();
    tasks.add(deadline);
    tasks.add(Task::timespan("Camp", at(2021, 8, 21, 6, 0), at(2021, 8, 23, 18, 0)).unwrap());
    tasks.add(Task::timespan("Call", at(2022, 1, 1, 9, 0), at(2022, 1, 1, 9, 0)).unwrap());
    tasks
}

fn varied_lists() -> Vec<TaskList> {
    let mut lists = vec![TaskList::new(), sample_list()];

    let mut edge_cases = TaskList::new();
    edge_cases.add(Task::plain("café / naïve: 100% done?").unwrap());
    edge_cases.add(Task::plain("T - 0 - looks like a record").unwrap());
    edge_cases.add(Task::deadline("leap day", at(2024, 2, 29, 0, 0)).unwrap());
    edge_cases.add(Task::deadline("last minute", at(1999, 12, 31, 23, 59)).unwrap());
    let mut long_event = Task::timespan(
        "trip /by /from /to",
        at(2023, 12, 30, 7, 5),
        at(2024, 1, 2, 21, 0),
    )
    .unwrap();
    long_event.mark_done();
    edge_cases.add(long_event);
    lists.push(edge_cases);

    let mut all_done = TaskList::new();
    for i in 0..25 {
        let due = at(2025, 1 + i % 12, 1 + i, i % 24, i);
        let mut task = Task::deadline(format!("chore {i}"), due).unwrap();
        task.mark_done();
        all_done.add(task);
    }
    lists.push(all_done);
    lists
}

#[test]
fn overwrite_then_load_preserves_varied_lists() {
    let temp = TempDir::new().unwrap();
    let mut store = FileTaskStore::new(temp.path().join("tasks.txt"));

    for tasks in varied_lists() {
        store.overwrite(&tasks).unwrap();
        let loaded = store.load().unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.tasks, tasks);
    }
}

#[test]
fn overwrite_then_load_preserves_everything() {
    let temp = TempDir::new().unwrap();
    let mut store = FileTaskStore::new(temp.path().join("nested").join("tasks.txt"));
    let tasks = sample_list();

    store.overwrite(&tasks).unwrap();
    let loaded = store.load().unwrap();

    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.tasks, tasks);
}

#[test]
fn overwrite_writes_one_record_per_line_in_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tasks.txt");
    let mut store = FileTaskStore::new(&path);

    store.overwrite(&sample_list()).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "T | 0 | read book\n\
         D | 1 | Submit | 2021-08-21 2350\n\
         E | 0 | Camp | 2021-08-21 0600 | 2021-08-23 1800\n\
         E | 0 | Call | 2022-01-01 0900 | 2022-01-01 0900\n"
    );
}

#[test]
fn overwrite_replaces_previous_content() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tasks.txt");
    fs::write(&path, "T | 0 | stale\nT | 0 | stale too\n").unwrap();
    let mut store = FileTaskStore::new(&path);

    let mut tasks = TaskList::new();
    tasks.add(Task::plain("fresh").unwrap());
    store.overwrite(&tasks).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "T | 0 | fresh\n");
}

#[test]
fn append_after_overwrite_extends_the_file() {
    let temp = TempDir::new().unwrap();
    let mut store = FileTaskStore::new(temp.path().join("tasks.txt"));

    store.overwrite(&sample_list()).unwrap();
    store.append(&Task::plain("one more").unwrap()).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.tasks.len(), 5);
    assert_eq!(loaded.tasks.get(4).unwrap().name(), "one more");
}

#[test]
fn corrupted_lines_are_skipped_without_affecting_neighbours() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tasks.txt");
    fs::write(
        &path,
        "T | 0 | first\n\
         D | 0 | no date\n\
         \n\
         D | 1 | bad date | 2021/08/21 2350\n\
         E | 0 | backwards | 2025-09-05 0000 | 2025-09-04 0000\n\
         D | 1 | last | 2021-08-21 2350\n",
    )
    .unwrap();

    let loaded = FileTaskStore::new(&path).load().unwrap();

    let names: Vec<&str> = loaded.tasks.iter().map(Task::name).collect();
    assert_eq!(names, vec!["first", "last"]);
    assert!(loaded.tasks.get(1).unwrap().is_done());
    assert_eq!(
        *loaded.tasks.get(1).unwrap().kind(),
        TaskKind::Deadline {
            due: at(2021, 8, 21, 23, 50)
        }
    );

    let reasons: Vec<(usize, CorruptionReason)> = loaded
        .warnings
        .into_iter()
        .map(|warning| (warning.line_number, warning.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (2, CorruptionReason::MissingTimestamp),
            (
                4,
                CorruptionReason::InvalidTimestamp("2021/08/21 2350".to_string())
            ),
            (5, CorruptionReason::ReversedWindow),
        ]
    );
}

#[test]
fn crlf_files_load_like_lf_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tasks.txt");
    fs::write(
        &path,
        "T | 0 | read book\r\nD | 1 | Submit | 2021-08-21 2350\r\n\r\nE | 0 | Camp | 2021-08-21 0600 | 2021-08-23 1800\r\n",
    )
    .unwrap();

    let loaded = FileTaskStore::new(&path).load().unwrap();

    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.tasks, {
        let mut expected = sample_list();
        expected.delete(3);
        expected
    });
}

#[test]
fn invalid_utf8_line_is_a_warning_not_a_load_failure() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tasks.txt");
    fs::write(
        &path,
        b"T | 0 | keep one\nT | 0 | bad \xff byte\nD | 1 | keep two | 2021-08-21 2350\n",
    )
    .unwrap();

    let loaded = FileTaskStore::new(&path).load().unwrap();

    let names: Vec<&str> = loaded.tasks.iter().map(Task::name).collect();
    assert_eq!(names, vec!["keep one", "keep two"]);
    assert_eq!(loaded.warnings.len(), 1);
    assert_eq!(loaded.warnings[0].line_number, 2);
    assert_eq!(loaded.warnings[0].reason, CorruptionReason::InvalidUtf8);
}

#[test]
fn hand_written_pipe_in_name_is_reported() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tasks.txt");
    fs::write(&path, "T | 0 | a|b\nT | 0 | fine\n").unwrap();

    let loaded = FileTaskStore::new(&path).load().unwrap();

    assert_eq!(loaded.tasks.len(), 1);
    assert_eq!(
        loaded.warnings[0].reason,
        CorruptionReason::ReservedCharacter('|')
    );
}
