//! Append-only log store
//!
//! The simplest log-structured store: every set appends a line, every get
//! scans the whole file and keeps the last match. No memtable, no index.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::record;

/// A single `key,value` log file with last-write-wins reads
#[derive(Debug, Clone)]
pub struct AppendLog {
    path: PathBuf,
}

impl AppendLog {
    /// Use the log at `path`; the file is created on the first set
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a record
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&record::encode(key, value))?;
        Ok(())
    }

    /// Scan the whole log for the last value written under `key`
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        let mut last = None;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            if let Some(entry) = record::decode(&line) {
                if entry.key == key {
                    last = Some(entry.value);
                }
            }
        }

        Ok(last)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
