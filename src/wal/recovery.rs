//! WAL Recovery
//!
//! Handles crash recovery by replaying the WAL.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{LsmError, Result};

use super::{LogLine, WalReader, WalRecord};

/// Handles WAL recovery after crash
pub struct WalRecovery;

/// Result of a recovery operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of records successfully recovered
    pub entries_recovered: u64,

    /// Number of malformed lines skipped
    pub entries_skipped: u64,

    /// Whether a torn tail was found (and, for `recover`, cut off)
    pub was_truncated: bool,

    /// Length of the log up to the end of its last complete line
    pub valid_len: u64,
}

impl WalRecovery {
    /// Recover records from a WAL file
    ///
    /// This will:
    /// 1. Read every line in file order
    /// 2. Skip malformed lines
    /// 3. Truncate an unterminated tail so later appends start on a fresh line
    /// 4. Return the valid records in order
    ///
    /// A missing file is a first start and yields nothing.
    pub fn recover(path: &Path) -> Result<(Vec<WalRecord>, RecoveryResult)> {
        let (records, result) = match Self::scan(path, true)? {
            Some(scanned) => scanned,
            None => return Ok((Vec::new(), RecoveryResult::default())),
        };

        if result.was_truncated {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(result.valid_len)?;
            file.sync_all()?;
            tracing::warn!(
                path = %path.display(),
                valid_len = result.valid_len,
                "Truncated torn record at WAL tail"
            );
        }

        Ok((records, result))
    }

    /// Verify integrity of a WAL file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        Ok(Self::scan(path, false)?
            .map(|(_, result)| result)
            .unwrap_or_default())
    }

    fn scan(path: &Path, collect: bool) -> Result<Option<(Vec<WalRecord>, RecoveryResult)>> {
        let mut reader = match WalReader::open(path) {
            Ok(reader) => reader,
            Err(LsmError::Io(e)) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut records = Vec::new();
        let mut result = RecoveryResult::default();

        while let Some(line) = reader.next_line()? {
            match line {
                LogLine::Record(record) => {
                    result.entries_recovered += 1;
                    if collect {
                        records.push(record);
                    }
                }
                LogLine::Malformed { offset } => {
                    result.entries_skipped += 1;
                    tracing::warn!(offset, path = %path.display(), "Skipping malformed WAL record");
                }
                LogLine::Torn { offset } => {
                    result.was_truncated = true;
                    result.valid_len = offset;
                    return Ok(Some((records, result)));
                }
            }
        }

        result.valid_len = reader.position();
        Ok(Some((records, result)))
    }
}
