//! Engine Module
//!
//! The core storage engine that coordinates all components.
//!
//! ## Responsibilities
//! - Coordinate WAL, MemTable, and Storage
//! - Handle concurrent read/write access
//! - Trigger flushes when MemTable is full
//! - Replay the WAL on startup

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::config::{Config, WalSyncStrategy};
use crate::error::Result;
use crate::memtable::{Entry, MemTable};
use crate::protocol::Command;
use crate::storage::StorageManager;
use crate::wal::{WalRecord, WalRecovery, WalWriter};

/// Everything the engine mutates, guarded as one unit
struct EngineState {
    memtable: MemTable,
    wal: WalWriter,
    storage: StorageManager,
}

/// The main storage engine
///
/// ## Concurrency Model
///
/// All mutable state sits behind a single `RwLock`:
///
/// - **Writes** (set/flush) hold the write lock for the whole
///   WAL append → memtable insert → flush sequence, so a flush is atomic
///   with respect to every other call.
/// - **Reads** (get) hold the read lock; any number run in parallel, and
///   none can observe a memtable that is cleared but whose SSTable is not
///   yet registered.
///
/// Construct once with [`Engine::open`] and share it as `Arc<Engine>`.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Location of the write-ahead log
    wal_path: PathBuf,

    state: RwLock<EngineState>,
}

impl Engine {
    const WAL_FILENAME: &'static str = "wal.log";

    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Create the data directory
    /// 2. Discover existing SSTables (and the next SSTable id)
    /// 3. Replay the WAL into a fresh memtable, in file order
    /// 4. Reopen the WAL for appending
    ///
    /// Replay never flushes, even past the threshold; the next set does.
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_wal(config, WalWriter::open)
    }

    /// Open with a custom WAL writer, created after replay from the WAL
    /// path and the configured sync strategy
    pub fn open_with_wal<F>(config: Config, open_wal: F) -> Result<Self>
    where
        F: FnOnce(&Path, WalSyncStrategy) -> Result<WalWriter>,
    {
        config.validate()?;

        fs::create_dir_all(&config.data_dir)?;

        let storage = StorageManager::open(&config.data_dir, &config.sstable_prefix)?;

        let wal_path = config.data_dir.join(Self::WAL_FILENAME);
        let (records, recovery) = WalRecovery::recover(&wal_path)?;

        let mut memtable = MemTable::new();
        for record in records {
            memtable.insert(record.key, record.value);
        }

        if recovery.entries_recovered > 0 || recovery.entries_skipped > 0 {
            tracing::info!(
                recovered = recovery.entries_recovered,
                skipped = recovery.entries_skipped,
                torn_tail = recovery.was_truncated,
                memtable_len = memtable.len(),
                "Replayed WAL"
            );
        }

        let wal = open_wal(&wal_path, config.wal_sync_strategy)?;

        tracing::info!(
            data_dir = %config.data_dir.display(),
            sstables = storage.sstable_count(),
            max_memtable_size = config.max_memtable_size,
            "Engine opened"
        );

        Ok(Self {
            config,
            wal_path,
            state: RwLock::new(EngineState {
                memtable,
                wal,
                storage,
            }),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers. Commands are expected to be
    /// validated already; the engine stores whatever it is given.
    pub fn execute(&self, command: Command) -> Result<Option<String>> {
        match command {
            Command::Get { key } => self.get(&key),
            Command::Set { key, value } => {
                self.set(&key, &value)?;
                Ok(None)
            }
            Command::Ping => Ok(Some("PONG".to_string())),
        }
    }

    /// Get a value by key
    ///
    /// Search order:
    /// 1. MemTable (most recent writes)
    /// 2. SSTables (newest to oldest)
    ///
    /// `Ok(None)` means not found and is not an error.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let state = self.state.read();

        if let Some(value) = state.memtable.get(key) {
            return Ok(Some(value.to_string()));
        }

        state.storage.get(key)
    }

    /// Set a key-value pair
    ///
    /// Steps:
    /// 1. Acquire write lock
    /// 2. Append to WAL; on failure nothing else happens
    /// 3. Insert into MemTable
    /// 4. Flush if the MemTable reached its threshold
    ///
    /// A flush failure is returned, but the write itself is already logged
    /// and visible; the memtable and WAL are left intact for the next try.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.write();

        state.wal.append(&WalRecord::new(key, value))?;

        state.memtable.insert(key, value);

        if state.memtable.should_flush(self.config.max_memtable_size) {
            Self::flush_locked(&mut state)?;
        }

        Ok(())
    }

    /// Flush memtable to disk (public API)
    ///
    /// Forces a flush regardless of memtable size
    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.write();
        Self::flush_locked(&mut state)
    }

    /// Internal flush implementation (called with write lock held)
    fn flush_locked(state: &mut EngineState) -> Result<()> {
        if state.memtable.is_empty() {
            return Ok(());
        }

        let sstable = match state.storage.flush(state.memtable.entries()) {
            Ok(sstable) => sstable,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    memtable_len = state.memtable.len(),
                    "Flush failed, keeping memtable and WAL"
                );
                return Err(e);
            }
        };

        tracing::info!(
            path = %sstable.path.display(),
            entries = sstable.entry_count,
            bytes = sstable.file_size,
            "Flushed memtable to SSTable"
        );

        state.memtable.clear();

        // The data is durable in the SSTable now; a stale WAL only costs a
        // redundant replay.
        if let Err(e) = state.wal.truncate() {
            tracing::warn!(error = %e, "Failed to truncate WAL after flush");
        }

        Ok(())
    }

    /// Sync the WAL to disk
    pub fn sync(&self) -> Result<()> {
        self.state.write().wal.sync()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the WAL path
    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }

    /// Number of distinct keys in the memtable
    pub fn memtable_len(&self) -> usize {
        self.state.read().memtable.len()
    }

    /// Copy of the memtable contents, in key order
    pub fn memtable_snapshot(&self) -> Vec<Entry> {
        self.state.read().memtable.entries().to_vec()
    }

    /// Get the number of SSTables
    pub fn sstable_count(&self) -> usize {
        self.state.read().storage.sstable_count()
    }

    /// SSTable paths, newest first
    pub fn sstable_paths(&self) -> Vec<PathBuf> {
        self.state.read().storage.sstable_paths()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
