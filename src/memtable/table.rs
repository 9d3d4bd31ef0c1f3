//! MemTable implementation
//!
//! Sorted-vector memtable with binary search insertion.

use std::slice;

use super::Entry;

/// In-memory table for recent writes
///
/// Invariant: for entries at positions `i < j`, `key[i] < key[j]`.
#[derive(Debug, Default, Clone)]
pub struct MemTable {
    entries: Vec<Entry>,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key.
    ///
    /// Returns the distinct-key count after the insert.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> usize {
        let key = key.into();
        let value = value.into();

        match self.search(&key) {
            Ok(pos) => self.entries[pos].value = value,
            Err(pos) => self.entries.insert(pos, Entry { key, value }),
        }

        self.entries.len()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.search(key)
            .ok()
            .map(|pos| self.entries[pos].value.as_str())
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if the table has reached the flush threshold
    pub fn should_flush(&self, max_entries: usize) -> bool {
        self.entries.len() >= max_entries
    }

    /// All entries in ascending key order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Iterate entries in ascending key order
    pub fn iter(&self) -> slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Clear all entries (after successful flush)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn search(&self, key: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| entry.key.as_str().cmp(key))
    }
}

impl<'a> IntoIterator for &'a MemTable {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
