//! Command definitions
//!
//! Represents commands from clients.

use crate::error::{LsmError, Result};
use crate::record;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Get = 0x01,
    Set = 0x02,
    Ping = 0x03,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Set a key-value pair
    Set { key: String, value: String },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Ping => CommandType::Ping,
        }
    }
}

/// Reject requests the engine must never see
///
/// Empty keys and values are refused, and so is anything the `key,value`
/// line format cannot store faithfully (a comma in a key, a newline
/// anywhere, a carriage return in a key or at the end of a value).
pub fn validate_command(command: &Command) -> Result<()> {
    match command {
        Command::Get { key } => validate_key(key),
        Command::Set { key, value } => {
            validate_key(key)?;
            if value.is_empty() {
                return Err(LsmError::InvalidRequest("missing value field".to_string()));
            }
            if !record::is_encodable(key, value) {
                return Err(LsmError::InvalidRequest(
                    "value must not contain a line break or end with a carriage return"
                        .to_string(),
                ));
            }
            Ok(())
        }
        Command::Ping => Ok(()),
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(LsmError::InvalidRequest("missing key field".to_string()));
    }
    if !record::is_encodable(key, "") {
        return Err(LsmError::InvalidRequest(
            "key must not contain ',', a line break or a carriage return".to_string(),
        ));
    }
    Ok(())
}
