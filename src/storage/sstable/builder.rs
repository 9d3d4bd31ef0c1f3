//! SSTable Builder
//!
//! Writes sorted key-value entries to a new SSTable file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{LsmError, Result};
use crate::record;

use super::SSTable;

/// Builder for creating new SSTables from sorted entries
pub struct SSTableBuilder {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Number of entries written
    entry_count: u64,
    /// Track min/max keys for metadata and ordering checks
    min_key: Option<String>,
    max_key: Option<String>,
    /// Scratch buffer for one encoded line
    line: Vec<u8>,
}

impl SSTableBuilder {
    /// Create a new SSTable builder
    ///
    /// Creates (or truncates) the file; call `add()` in strictly ascending
    /// key order, then `finish()` to flush and fsync.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            entry_count: 0,
            min_key: None,
            max_key: None,
            line: Vec::with_capacity(128),
        })
    }

    /// Add a key-value pair (must be called in strictly ascending key order)
    pub fn add(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(last) = &self.max_key {
            if key <= last.as_str() {
                return Err(LsmError::Storage(format!(
                    "SSTable keys out of order: {:?} after {:?}",
                    key, last
                )));
            }
        }

        self.line.clear();
        record::encode_into(key, value, &mut self.line);
        self.writer.write_all(&self.line)?;

        if self.min_key.is_none() {
            self.min_key = Some(key.to_string());
        }
        self.max_key = Some(key.to_string());
        self.entry_count += 1;

        Ok(())
    }

    /// Number of entries added so far
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Finish building: flush, fsync and return metadata
    pub fn finish(mut self) -> Result<SSTable> {
        self.writer.flush()?;

        let file = self.writer.into_inner().map_err(|e| {
            LsmError::Storage(format!("Failed to flush SSTable: {}", e))
        })?;
        file.sync_all()?;

        let file_size = file.metadata()?.len();

        Ok(SSTable {
            path: self.path,
            entry_count: self.entry_count,
            min_key: self.min_key.unwrap_or_default(),
            max_key: self.max_key.unwrap_or_default(),
            file_size,
        })
    }
}
