//! Error types for lsmkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using LsmError
pub type Result<T> = std::result::Result<T, LsmError>;

/// Unified error type for lsmkv operations
///
/// Not-found is never an error: lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum LsmError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    /// Rejected by request validation before reaching the engine
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
