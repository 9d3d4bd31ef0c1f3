//! Write-Ahead Log (WAL) Module
//!
//! Provides durability guarantees through append-only logging.
//!
//! ## Responsibilities
//! - Append a record before any memtable mutation
//! - Replay every record, in file order, on startup
//! - Skip malformed lines and repair a torn tail left by a crash
//! - Truncate once the memtable has been flushed
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────┐
//! │ key1,value1\n               │
//! │ key2,value2\n               │
//! │ key1,value3\n   (overrides) │
//! └─────────────────────────────┘
//! ```
//!
//! Records are unsorted and may repeat keys; the later record wins on replay.

mod record;
mod writer;
mod reader;
mod recovery;

pub use record::WalRecord;
pub use writer::{LogFile, WalWriter};
pub use reader::{LogLine, WalReader};
pub use recovery::{RecoveryResult, WalRecovery};
