//! SSTable Iterator
//!
//! Sequential iteration over all entries in an SSTable.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::memtable::Entry;
use crate::record;

/// Iterator over SSTable entries in sorted key order
///
/// Malformed lines are skipped, matching what the reader indexes.
pub struct SSTableIterator {
    reader: BufReader<File>,
    line: Vec<u8>,
}

impl SSTableIterator {
    pub(super) fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            reader: BufReader::new(File::open(path)?),
            line: Vec::new(),
        })
    }
}

impl Iterator for SSTableIterator {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    if let Some(entry) = record::decode(&self.line) {
                        return Some(Ok(entry));
                    }
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
