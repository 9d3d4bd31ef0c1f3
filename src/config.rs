//! Configuration for lsmkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{LsmError, Result};

/// Main configuration for an lsmkv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the WAL and every SSTable.
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── wal.log                 (write-ahead log)
    ///     ├── {prefix}-0001.sst       (oldest SSTable)
    ///     └── {prefix}-0002.sst
    pub data_dir: PathBuf,

    /// File name prefix for SSTables
    pub sstable_prefix: String,

    // -------------------------------------------------------------------------
    // WAL Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync WAL
    pub wal_sync_strategy: WalSyncStrategy,

    // -------------------------------------------------------------------------
    // MemTable Configuration
    // -------------------------------------------------------------------------
    /// Number of distinct keys the memtable holds before it is flushed
    pub max_memtable_size: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving client connections
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

/// WAL sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalSyncStrategy {
    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced entries (balanced durability/performance)
    EveryNEntries { count: usize },

    /// Hand every record to the OS before returning, never fsync explicitly.
    /// Survives a process crash, not a power loss.
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./sstable"),
            sstable_prefix: "sstable".to_string(),
            wal_sync_strategy: WalSyncStrategy::OsBuffered,
            max_memtable_size: 1000,
            listen_addr: "127.0.0.1:8080".to_string(),
            worker_threads: 8,
            read_timeout_ms: 30_000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the settings the engine and server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_memtable_size == 0 {
            return Err(LsmError::Config(
                "max_memtable_size must be at least 1".to_string(),
            ));
        }

        if self.sstable_prefix.is_empty() {
            return Err(LsmError::Config("sstable_prefix must not be empty".to_string()));
        }

        if self.sstable_prefix.contains(['/', '\\']) {
            return Err(LsmError::Config(format!(
                "sstable_prefix must be a plain file name, got {:?}",
                self.sstable_prefix
            )));
        }

        if let WalSyncStrategy::EveryNEntries { count: 0 } = self.wal_sync_strategy {
            return Err(LsmError::Config(
                "EveryNEntries sync count must be at least 1".to_string(),
            ));
        }

        if self.worker_threads == 0 {
            return Err(LsmError::Config("worker_threads must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (WAL and SSTables live here)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the SSTable file name prefix
    pub fn sstable_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.sstable_prefix = prefix.into();
        self
    }

    /// Set the WAL sync strategy
    pub fn wal_sync_strategy(mut self, strategy: WalSyncStrategy) -> Self {
        self.config.wal_sync_strategy = strategy;
        self
    }

    /// Set the flush threshold (distinct keys)
    pub fn max_memtable_size(mut self, entries: usize) -> Self {
        self.config.max_memtable_size = entries;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
