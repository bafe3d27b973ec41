//! Ordered in-memory task collection.
//!
//! # Invariants
//! - Insertion order is display order.
//! - Indices are zero-based; callers validate range before mutating.

use super::task::Task;
use chrono::NaiveDate;

/// The task collection for one running session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `task` and returns a reference to the stored entry.
    pub fn add(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    /// Removes and returns the task at `index`, shifting later tasks down.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn delete(&mut self, index: usize) -> Option<Task> {
        if index < self.tasks.len() {
            Some(self.tasks.remove(index))
        } else {
            None
        }
    }

    /// Puts `task` back at `index`; `index == len()` appends.
    ///
    /// # Panics
    /// Panics when `index > len()`.
    pub fn insert(&mut self, index: usize, task: Task) {
        self.tasks.insert(index, task);
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Returns whether every task is done. Vacuously true for an empty list.
    pub fn is_all_marked(&self) -> bool {
        self.tasks.iter().all(Task::is_done)
    }

    /// Case-insensitive substring search on task names.
    pub fn find(&self, keyword: &str) -> Vec<&Task> {
        let needle = keyword.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| task.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Tasks whose date predicate matches `date`, in list order.
    pub fn scheduled_on(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.is_scheduled_on(date))
            .collect()
    }

    /// Returns whether an equivalent task is already present.
    ///
    /// No command path calls this; embedders may use it to reject
    /// duplicate inserts.
    pub fn contains_duplicate_of(&self, candidate: &Task) -> bool {
        self.tasks.iter().any(|task| task.is_duplicate_of(candidate))
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(names: &[&str]) -> TaskList {
        let mut list = TaskList::new();
        for name in names {
            list.add(Task::plain(*name).unwrap());
        }
        list
    }

    #[test]
    fn delete_shifts_later_tasks_down() {
        let mut list = list_of(&["a", "b", "c"]);

        let removed = list.delete(1).unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).unwrap().name(), "c");
        assert!(list.delete(2).is_none());
    }

    #[test]
    fn is_all_marked_tracks_done_flags() {
        let mut list = list_of(&["a", "b"]);
        assert!(!list.is_all_marked());

        list.get_mut(0).unwrap().mark_done();
        assert!(!list.is_all_marked());
        list.get_mut(1).unwrap().mark_done();
        assert!(list.is_all_marked());
    }

    #[test]
    fn find_matches_case_insensitively() {
        let list = list_of(&["Team meeting", "Dentist", "MEETING notes"]);
        let names: Vec<&str> = list.find("meeting").into_iter().map(Task::name).collect();
        assert_eq!(names, vec!["Team meeting", "MEETING notes"]);
        assert!(list.find("gym").is_empty());
    }

    #[test]
    fn contains_duplicate_of_ignores_done_state() {
        let mut list = list_of(&["a"]);
        list.get_mut(0).unwrap().mark_done();
        assert!(list.contains_duplicate_of(&Task::plain("a").unwrap()));
        assert!(!list.contains_duplicate_of(&Task::plain("b").unwrap()));
    }
}
