//! SSTable Module
//!
//! Sorted String Table - immutable on-disk sorted key-value storage.
//!
//! ## Lookup
//! ```text
//!   offsets (built at open)          file
//!   ┌─────┐                   ┌──────────────┐
//!   │  0  │ ───────────────▶  │ apple,red    │
//!   │ 10  │ ───────────────▶  │ banana,yellow│
//!   │ 24  │ ───────────────▶  │ cherry,red   │
//!   └─────┘                   └──────────────┘
//! ```
//! Binary search over the offset vector; each probe seeks to one record
//! and reads a single line, so a lookup costs O(log n) record reads.

mod builder;
mod iterator;
mod reader;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{LsmError, Result};

pub use builder::SSTableBuilder;
pub use iterator::SSTableIterator;
pub use reader::SSTableReader;

// =============================================================================
// SSTable Metadata
// =============================================================================

/// Metadata returned when an SSTable has been written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SSTable {
    /// Path to the SSTable file
    pub path: PathBuf,
    /// Number of entries in this SSTable
    pub entry_count: u64,
    /// Smallest key (for range filtering)
    pub min_key: String,
    /// Largest key (for range filtering)
    pub max_key: String,
    /// File size in bytes
    pub file_size: u64,
}

impl SSTable {
    /// Get the number of entries
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Quick check if a key might be in this SSTable (range check)
    /// Returns false if key is definitely outside [min_key, max_key]
    pub fn might_contain(&self, key: &str) -> bool {
        key >= self.min_key.as_str() && key <= self.max_key.as_str()
    }
}

/// Look a key up in the SSTable at `path` without keeping a reader around.
///
/// A missing file is an empty table: `Ok(None)`, not an error.
pub fn lookup(path: &Path, key: &str) -> Result<Option<String>> {
    match SSTableReader::open(path) {
        Ok(reader) => reader.get(key),
        Err(LsmError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
