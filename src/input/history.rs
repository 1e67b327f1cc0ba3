//! Recall log for submitted input lines.
//!
//! The navigation cursor counts how far back the user has recalled: `-1`
//! means the live edit line, `0` the newest stored entry, `len - 1` the
//! oldest. Session-scoped; nothing is persisted.

#[derive(Debug, Default)]
pub struct InputHistory {
    entries: Vec<String>,
    cursor: isize,
}

impl InputHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[cfg(test)]
    pub fn set_cursor(&mut self, cursor: isize) {
        self.cursor = cursor;
    }

    /// Append a submitted line. Empty or whitespace-only entries are
    /// dropped, an entry equal to the current last entry is not appended
    /// again, and any adjacent duplicate pairs already in the log are
    /// collapsed. Resets the navigation cursor to the live edit line.
    pub fn push(&mut self, entry: &str) {
        if entry.trim().is_empty() {
            return;
        }
        self.entries.dedup();
        if self.entries.last().map(String::as_str) != Some(entry) {
            self.entries.push(entry.to_string());
        }
        self.cursor = -1;
    }

    /// Recall one entry older. The first call from the live edit line
    /// returns the newest entry; once at the oldest entry, further calls
    /// repeat it. Returns `""` when the log is empty.
    pub fn previous(&mut self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }
        let max = self.entries.len() as isize - 1;
        let normalized = self.cursor.clamp(-1, max);
        self.cursor = (normalized + 1).min(max);
        self.entry_at(self.cursor)
    }

    /// Recall one entry newer. From the newest stored entry (or any invalid
    /// cursor) this resets to the live edit line and returns `""`.
    pub fn next(&mut self) -> String {
        if self.cursor <= 0 {
            self.cursor = -1;
            return String::new();
        }
        let max = self.entries.len() as isize - 1;
        self.cursor = self.cursor.min(max) - 1;
        self.entry_at(self.cursor)
    }

    fn entry_at(&self, cursor: isize) -> String {
        let idx = self.entries.len() as isize - 1 - cursor;
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.entries.get(i))
            .cloned()
            .unwrap_or_default()
    }
}
