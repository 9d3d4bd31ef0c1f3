//! WAL Writer
//!
//! Handles appending records to the WAL file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::WalSyncStrategy;
use crate::error::Result;

use super::WalRecord;

/// Backing storage for a [`WalWriter`]
///
/// Implemented for [`File`]; other implementations let callers place the
/// log on different media or inject I/O faults.
pub trait LogFile: Write + Send + Sync {
    /// Flush written data to stable storage
    fn sync(&mut self) -> io::Result<()>;

    /// Shrink (or extend) the log to exactly `len` bytes
    fn set_len(&mut self, len: u64) -> io::Result<()>;

    /// Current length of the log in bytes
    fn len(&self) -> io::Result<u64>;
}

impl LogFile for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)?;
        self.sync_all()
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

/// Writes records to the WAL file
pub struct WalWriter {
    path: PathBuf,
    /// Opened in append mode, so every write lands at the current end
    file: Box<dyn LogFile>,
    sync_strategy: WalSyncStrategy,
    /// End of the last complete record; bytes past it are a partial write
    len: u64,
    /// Records written since the last fsync
    unsynced: usize,
    /// Records appended since open or the last truncate
    record_count: u64,
    /// Scratch buffer reused across appends
    buf: Vec<u8>,
}

impl WalWriter {
    /// Open or create a WAL file for appending
    ///
    /// The file is expected to end on a record boundary; run
    /// [`WalRecovery::recover`](super::WalRecovery::recover) first.
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        Self::with_file(path, Box::new(file), sync_strategy)
    }

    /// Wrap an already opened log
    pub fn with_file(
        path: &Path,
        file: Box<dyn LogFile>,
        sync_strategy: WalSyncStrategy,
    ) -> Result<Self> {
        let len = file.len()?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            sync_strategy,
            len,
            unsynced: 0,
            record_count: 0,
            buf: Vec::with_capacity(256),
        })
    }

    /// Append a record to the WAL
    ///
    /// The whole line is handed to the OS in one `write_all` before this
    /// returns; whether it is also fsynced depends on the sync strategy.
    ///
    /// A failed write is cut back off the log, and any partial bytes a
    /// previous failure left behind are dropped before writing, so a new
    /// record always starts on a fresh line.
    pub fn append(&mut self, record: &WalRecord) -> Result<()> {
        self.buf.clear();
        crate::record::encode_into(&record.key, &record.value, &mut self.buf);

        self.discard_partial()?;

        if let Err(e) = self.file.write_all(&self.buf) {
            if let Err(trim) = self.file.set_len(self.len) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %trim,
                    "Failed to cut partial record off WAL"
                );
            }
            return Err(e.into());
        }

        self.len += self.buf.len() as u64;
        self.unsynced += 1;
        self.record_count += 1;

        match self.sync_strategy {
            WalSyncStrategy::EveryWrite => self.sync()?,
            WalSyncStrategy::EveryNEntries { count } if self.unsynced >= count => self.sync()?,
            _ => {}
        }

        Ok(())
    }

    fn discard_partial(&mut self) -> Result<()> {
        let end = self.file.len()?;
        if end > self.len {
            tracing::warn!(
                path = %self.path.display(),
                valid_len = self.len,
                found = end,
                "Dropping partial record at WAL tail"
            );
            self.file.set_len(self.len)?;
        } else if end < self.len {
            self.len = end;
        }
        Ok(())
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Drop every record (called after a successful flush)
    pub fn truncate(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.len = 0;
        self.unsynced = 0;
        self.record_count = 0;
        Ok(())
    }

    /// Records appended since open or the last truncate
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Records not yet fsynced
    pub fn unsynced(&self) -> usize {
        self.unsynced
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
