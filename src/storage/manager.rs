//! Storage Manager
//!
//! Manages the set of SSTables and coordinates reads/writes.
//!
//! ## Responsibilities
//! - Discover existing SSTables on startup
//! - Search SSTables newest → oldest for reads
//! - Create new SSTables from MemTable flushes
//! - Hand out monotonically increasing SSTable ids

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LsmError, Result};
use crate::memtable::Entry;

use super::{SSTable, SSTableBuilder, SSTableReader};

/// Manages the storage layer
///
/// Not internally synchronized: the engine's RwLock guards it. Reads take
/// `&self`, flushes take `&mut self`.
pub struct StorageManager {
    /// Directory where SSTables are stored
    data_dir: PathBuf,

    /// File name prefix shared by every SSTable
    prefix: String,

    /// Open SSTable readers with their ids, ordered newest → oldest
    sstables: Vec<(u64, SSTableReader)>,

    /// Id the next flush will use
    next_sstable_id: u64,
}

impl StorageManager {
    /// Open or create storage in the given directory
    ///
    /// On startup:
    /// 1. Create directory if it doesn't exist
    /// 2. Discover existing `{prefix}-NNNN.sst` files
    /// 3. Open readers for each (builds offset indexes)
    /// 4. Order by ID descending (newest first)
    pub fn open(path: &Path, prefix: &str) -> Result<Self> {
        fs::create_dir_all(path)?;

        let mut sstable_ids: Vec<u64> = Vec::new();
        for entry in fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() {
                if let Some(id) = Self::parse_sstable_id(prefix, &file_path) {
                    sstable_ids.push(id);
                }
            }
        }

        // Sort newest first (highest ID first)
        sstable_ids.sort_unstable_by(|a, b| b.cmp(a));

        let mut sstables = Vec::with_capacity(sstable_ids.len());
        for &id in &sstable_ids {
            let reader = SSTableReader::open(&Self::sstable_path_with_dir(path, prefix, id))?;
            sstables.push((id, reader));
        }

        // Next ID = max + 1, or 1 if no SSTables exist
        let next_sstable_id = sstable_ids.first().map(|&id| id + 1).unwrap_or(1);

        tracing::debug!(
            dir = %path.display(),
            sstables = sstables.len(),
            next_sstable_id,
            "Storage opened"
        );

        Ok(Self {
            data_dir: path.to_path_buf(),
            prefix: prefix.to_string(),
            sstables,
            next_sstable_id,
        })
    }

    /// Get a value by key (searches all SSTables newest → oldest)
    ///
    /// The first table holding the key wins; older copies are shadowed.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        for (_, reader) in &self.sstables {
            // Skip SSTable if key is outside its range
            if !reader.might_contain(key) {
                continue;
            }

            if let Some(value) = reader.get(key)? {
                return Ok(Some(value));
            }
        }

        Ok(None)
    }

    /// Flush sorted entries to a new SSTable
    ///
    /// The id is only consumed once the file is written and opened, so a
    /// failed flush is retried under the same name.
    pub fn flush(&mut self, entries: &[Entry]) -> Result<SSTable> {
        if entries.is_empty() {
            return Err(LsmError::Storage("Cannot flush empty MemTable".to_string()));
        }

        // The directory may have been removed since open
        fs::create_dir_all(&self.data_dir)?;

        let id = self.next_sstable_id;
        let path = self.sstable_path(id);

        let mut builder = SSTableBuilder::new(&path)?;
        for entry in entries {
            builder.add(&entry.key, &entry.value)?;
        }
        let metadata = builder.finish()?;

        let reader = SSTableReader::open(&path)?;
        self.sstables.insert(0, (id, reader));
        self.next_sstable_id += 1;

        Ok(metadata)
    }

    /// Get the number of SSTables
    pub fn sstable_count(&self) -> usize {
        self.sstables.len()
    }

    /// Paths of all SSTables, newest first
    pub fn sstable_paths(&self) -> Vec<PathBuf> {
        self.sstables
            .iter()
            .map(|(_, reader)| reader.path().to_path_buf())
            .collect()
    }

    /// Ids of all SSTables, newest first
    pub fn sstable_ids(&self) -> Vec<u64> {
        self.sstables.iter().map(|(id, _)| *id).collect()
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the next SSTable ID (for testing/debugging)
    pub fn next_sstable_id(&self) -> u64 {
        self.next_sstable_id
    }

    // =========================================================================
    // Path Helpers
    // =========================================================================

    /// Generate the file path for an SSTable with given ID
    pub fn sstable_path(&self, id: u64) -> PathBuf {
        Self::sstable_path_with_dir(&self.data_dir, &self.prefix, id)
    }

    /// Generate SSTable path given a directory, prefix and ID
    /// ("sstable", 7) → "{dir}/sstable-0007.sst"
    pub fn sstable_path_with_dir(dir: &Path, prefix: &str, id: u64) -> PathBuf {
        dir.join(format!("{}-{:04}.sst", prefix, id))
    }

    /// Parse SSTable ID from filename
    /// "sstable-0042.sst" → Some(42)
    fn parse_sstable_id(prefix: &str, path: &Path) -> Option<u64> {
        let name = path.file_name()?.to_str()?;
        let id_str = name
            .strip_prefix(prefix)?
            .strip_prefix('-')?
            .strip_suffix(".sst")?;

        if id_str.is_empty() || !id_str.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        id_str.parse().ok()
    }
}
