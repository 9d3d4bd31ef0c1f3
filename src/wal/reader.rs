//! WAL Reader
//!
//! Handles reading records from the WAL file, line by line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

use super::WalRecord;

/// One line of the WAL, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    /// A well-formed record
    Record(WalRecord),

    /// A complete line that does not parse (no delimiter, bad UTF-8)
    Malformed { offset: u64 },

    /// Bytes after the last newline: a write that never completed
    Torn { offset: u64 },
}

/// Reads records from the WAL file
pub struct WalReader {
    reader: BufReader<File>,
    /// Byte offset of the next unread line
    position: u64,
    line: Vec<u8>,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
            line: Vec::new(),
        })
    }

    /// Read and classify the next line
    pub fn next_line(&mut self) -> Result<Option<LogLine>> {
        self.line.clear();
        let offset = self.position;
        let read = self.reader.read_until(b'\n', &mut self.line)?;
        if read == 0 {
            return Ok(None);
        }
        self.position += read as u64;

        if self.line.last() != Some(&b'\n') {
            return Ok(Some(LogLine::Torn { offset }));
        }

        Ok(Some(match WalRecord::deserialize(&self.line) {
            Some(record) => LogLine::Record(record),
            None => LogLine::Malformed { offset },
        }))
    }

    /// Byte offset just past the last line read
    pub fn position(&self) -> u64 {
        self.position
    }
}

/// Yields well-formed records only; malformed and torn lines are skipped
impl Iterator for WalReader {
    type Item = Result<WalRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_line() {
                Ok(Some(LogLine::Record(record))) => return Some(Ok(record)),
                Ok(Some(_)) => continue,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
