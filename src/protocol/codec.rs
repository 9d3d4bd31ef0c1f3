//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET:  key_len (4 bytes) + key
//! - SET:  key_len (4 bytes) + key + value
//! - PING: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! All integers are big-endian; keys, values and messages are UTF-8.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{LsmError, Result};

use super::{Command, CommandType, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Bytes {
    let mut payload = BytesMut::new();
    match command {
        Command::Get { key } => {
            payload.put_u32(key.len() as u32);
            payload.put_slice(key.as_bytes());
        }
        Command::Set { key, value } => {
            payload.put_u32(key.len() as u32);
            payload.put_slice(key.as_bytes());
            payload.put_slice(value.as_bytes());
        }
        Command::Ping => {}
    }

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from a complete frame
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_type, payload) = split_frame(bytes, "command")?;

    match cmd_type {
        t if t == CommandType::Get as u8 => {
            let (key, rest) = decode_key(payload, "GET")?;
            if !rest.is_empty() {
                return Err(LsmError::Protocol(format!(
                    "GET command: {} trailing bytes",
                    rest.len()
                )));
            }
            Ok(Command::Get { key })
        }
        t if t == CommandType::Set as u8 => {
            let (key, rest) = decode_key(payload, "SET")?;
            let value = decode_utf8(rest, "SET value")?;
            Ok(Command::Set { key, value })
        }
        t if t == CommandType::Ping as u8 => {
            if !payload.is_empty() {
                return Err(LsmError::Protocol(format!(
                    "PING command: unexpected payload of {} bytes",
                    payload.len()
                )));
            }
            Ok(Command::Ping)
        }
        _ => Err(LsmError::Protocol(format!(
            "Unknown command type: 0x{:02x}",
            cmd_type
        ))),
    }
}

/// Decode `key_len (4) + key`, returning the key and the bytes after it
fn decode_key<'a>(mut payload: &'a [u8], command: &str) -> Result<(String, &'a [u8])> {
    if payload.remaining() < 4 {
        return Err(LsmError::Protocol(format!(
            "{} command: missing key length",
            command
        )));
    }

    let key_len = payload.get_u32() as usize;
    if payload.len() < key_len {
        return Err(LsmError::Protocol(format!(
            "{} command: incomplete key (expected {}, got {})",
            command,
            key_len,
            payload.len()
        )));
    }

    let key = decode_utf8(&payload[..key_len], "key")?;
    Ok((key, &payload[key_len..]))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Bytes {
    let payload = response.payload.as_deref().unwrap_or("");
    frame(response.status as u8, payload.as_bytes())
}

/// Decode a response from a complete frame
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response")?;

    let status = Status::from_u8(status_byte).ok_or_else(|| {
        LsmError::Protocol(format!("Unknown response status: 0x{:02x}", status_byte))
    })?;

    let payload = if payload.is_empty() {
        None
    } else {
        Some(decode_utf8(payload, "response payload")?)
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Framing
// =============================================================================

fn frame(tag: u8, payload: &[u8]) -> Bytes {
    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(tag);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    message.freeze()
}

/// Validate a frame and split it into its tag byte and payload
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(LsmError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let tag = header.get_u8();
    let payload_len = checked_payload_len(header.get_u32(), what)?;

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(LsmError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((tag, &bytes[HEADER_SIZE..total_len]))
}

fn checked_payload_len(len: u32, what: &str) -> Result<usize> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(LsmError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(len as usize)
}

fn decode_utf8(bytes: &[u8], what: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| LsmError::Protocol(format!("{} is not valid UTF-8", what)))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R, what: &str) -> Result<BytesMut> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = checked_payload_len(
        u32::from_be_bytes([header[1], header[2], header[3], header[4]]),
        what,
    )?;

    let mut message = BytesMut::zeroed(HEADER_SIZE + payload_len);
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader, "command")?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(&encode_command(command))?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader, "response")?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response))?;
    writer.flush()?;
    Ok(())
}
