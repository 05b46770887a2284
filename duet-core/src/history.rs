//! Bounded FIFO of recently played note identifiers.

use std::collections::VecDeque;

use duet_types::Note;

/// Notes remembered for key detection unless configured otherwise.
pub const DEFAULT_HISTORY_SIZE: usize = 8;

/// Raw note text as played, most recent last. Entries are kept verbatim so a
/// malformed identifier occupies a slot but is skipped when parsed.
#[derive(Debug, Clone)]
pub struct NoteHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for NoteHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }
}

impl NoteHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append, evicting the oldest entry on overflow.
    pub fn push(&mut self, note: impl Into<String>) {
        self.entries.push_back(note.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Parsed notes in play order; unparsable entries are dropped.
    pub fn notes(&self) -> Vec<Note> {
        self.entries
            .iter()
            .filter_map(|text| Note::parse(text).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, Once};

    static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut messages) = MESSAGES.lock() {
                messages.push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = log::set_logger(&CaptureLogger);
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    #[test]
    fn evicts_oldest_first() {
        let mut history = NoteHistory::default();
        for i in 0..10 {
            history.push(format!("C{}", i % 10));
        }
        assert_eq!(history.len(), 8);
        let entries: Vec<&str> = history.entries().collect();
        assert_eq!(entries.first(), Some(&"C2"));
        assert_eq!(entries.last(), Some(&"C9"));
    }

    #[test]
    fn notes_skip_malformed_entries() {
        let mut history = NoteHistory::default();
        history.push("C4");
        history.push("garbage");
        history.push("G4");
        assert_eq!(history.len(), 3);
        let names: Vec<String> = history.notes().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["C4", "G4"]);
    }

    #[test]
    fn clear_empties() {
        let mut history = NoteHistory::with_capacity(2);
        history.push("C4");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 2);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history = NoteHistory::with_capacity(0);
        history.push("C4");
        history.push("D4");
        assert_eq!(history.entries().collect::<Vec<_>>(), vec!["D4"]);
    }

    #[test]
    fn parsing_malformed_entries_logs_nothing() {
        capture_logs();
        let mut history = NoteHistory::default();
        history.push("not-a-note-Q9");
        history.push("E4");
        for _ in 0..3 {
            assert_eq!(history.notes().len(), 1);
        }
        let messages = MESSAGES.lock().unwrap();
        assert!(!messages.iter().any(|m| m.contains("not-a-note-Q9")));
    }
}
