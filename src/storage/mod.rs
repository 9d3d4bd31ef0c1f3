//! Storage Module
//!
//! Persistent storage layer built from immutable sorted files.
//!
//! ## Responsibilities
//! - Persist flushed memtables to disk in sorted format
//! - Point lookups by binary search over record positions
//! - Enumerate SSTables and search them newest → oldest
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────┐
//! │ a,1\n                    │
//! │ b,2\n                    │
//! │ c,3\n                    │
//! └──────────────────────────┘
//! ```
//!
//! One `key,value` line per record, ascending by key. No header, footer,
//! index block or checksum: the offset index is rebuilt when a reader opens.

pub mod sstable;
mod manager;
mod append_log;

pub use sstable::{SSTable, SSTableBuilder, SSTableIterator, SSTableReader};
pub use manager::StorageManager;
pub use append_log::AppendLog;
