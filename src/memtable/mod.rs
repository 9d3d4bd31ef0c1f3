//! MemTable Module
//!
//! In-memory data structure for recent writes.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Keep keys unique and strictly ascending at all times
//! - Track the distinct-key count for flush triggers
//! - Ordered iteration for SSTable creation
//!
//! ## Data Structure Choice
//! A `Vec<Entry>` kept sorted by binary search:
//! - Ordered keys (required for SSTable generation)
//! - The whole slice is handed to the SSTable builder on flush
//! - No internal locking; the engine's RwLock guards it

mod table;

pub use table::MemTable;

/// A single key-value pair, ordered by key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
