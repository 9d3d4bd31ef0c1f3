//! # lsmkv
//!
//! A log-structured key-value store with:
//! - A sorted in-memory write buffer (memtable)
//! - Immutable sorted flushes to disk (SSTables)
//! - Write-Ahead Logging (WAL) for crash recovery
//! - One reader/writer lock: serialized writes, parallel reads
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                             │
//! │              (worker pool, validation)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Arc<Engine>
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                │
//! │            RwLock<memtable + WAL + SSTables>                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │ set                     │ get
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │     WAL     │          │  MemTable   │
//!   │  (Append)   │          │  (sorted)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          ▼                        ▼  miss
//!   ┌─────────────┐          ┌─────────────┐
//!   │  MemTable   │─ flush ─▶│  SSTables   │
//!   │             │          │ newest→old  │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod wal;
pub mod memtable;
pub mod storage;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LsmError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of lsmkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
