//! SSTable Reader
//!
//! Opens SSTable files and provides O(log n) key lookups via an in-memory
//! offset index.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{LsmError, Result};
use crate::memtable::Entry;
use crate::record;

use super::iterator::SSTableIterator;

/// Reader for SSTable files with an in-memory offset index
///
/// Holds no open file handle: every lookup opens its own, so `get` takes
/// `&self` and concurrent readers never contend on a seek position.
#[derive(Debug)]
pub struct SSTableReader {
    path: PathBuf,
    /// Byte offset of every well-formed record, in key order
    offsets: Vec<u64>,
    min_key: Option<String>,
    max_key: Option<String>,
    /// Malformed lines seen while indexing
    skipped: u64,
}

impl SSTableReader {
    /// Open an SSTable for reading
    ///
    /// Scans the file once, recording where each record starts.
    pub fn open(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut offsets = Vec::new();
        let mut min_key = None;
        let mut max_key = None;
        let mut skipped = 0;

        let mut line = Vec::new();
        let mut position = 0u64;
        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }

            match record::decode(&line) {
                Some(entry) => {
                    offsets.push(position);
                    if min_key.is_none() {
                        min_key = Some(entry.key.clone());
                    }
                    max_key = Some(entry.key);
                }
                None => skipped += 1,
            }
            position += read as u64;
        }

        if skipped > 0 {
            tracing::warn!(path = %path.display(), skipped, "Skipped malformed SSTable records");
        }

        Ok(Self {
            path: path.to_path_buf(),
            offsets,
            min_key,
            max_key,
            skipped,
        })
    }

    /// Get a value by key, O(log n) record reads
    ///
    /// Returns `Ok(None)` when the key is absent, including when the file has
    /// been removed since it was opened.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if self.offsets.is_empty() {
            return Ok(None);
        }

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);
        let mut line = Vec::new();

        let (mut lo, mut hi) = (0, self.offsets.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let entry = self.read_at(&mut reader, self.offsets[mid], &mut line)?;

            match entry.key.as_str().cmp(key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(Some(entry.value)),
            }
        }

        Ok(None)
    }

    /// Seek to `offset` and decode the record there
    fn read_at(
        &self,
        reader: &mut BufReader<File>,
        offset: u64,
        line: &mut Vec<u8>,
    ) -> Result<Entry> {
        reader.seek(SeekFrom::Start(offset))?;
        line.clear();
        reader.read_until(b'\n', line)?;

        record::decode(line).ok_or_else(|| {
            LsmError::Storage(format!(
                "SSTable {} changed since open: no record at offset {}",
                self.path.display(),
                offset
            ))
        })
    }

    /// Get entry count
    pub fn entry_count(&self) -> u64 {
        self.offsets.len() as u64
    }

    /// Number of malformed lines skipped while indexing
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the minimum key in this SSTable (for range filtering)
    pub fn min_key(&self) -> Option<&str> {
        self.min_key.as_deref()
    }

    /// Get the maximum key in this SSTable (for range filtering)
    pub fn max_key(&self) -> Option<&str> {
        self.max_key.as_deref()
    }

    /// Quick check if a key might be in this SSTable (range check)
    /// Returns false only if the key is definitely outside [min_key, max_key]
    pub fn might_contain(&self, key: &str) -> bool {
        match (self.min_key(), self.max_key()) {
            (Some(min), Some(max)) => key >= min && key <= max,
            _ => false, // Empty SSTable
        }
    }

    /// Create an iterator over all entries (for inspection and tests)
    pub fn iter(&self) -> Result<SSTableIterator> {
        SSTableIterator::open(&self.path)
    }
}
