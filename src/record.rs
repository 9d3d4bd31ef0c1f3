//! Line record format
//!
//! Both the WAL and SSTables store one record per line:
//!
//! ```text
//! key,value\n
//! ```
//!
//! A line is split at the FIRST comma, so values may contain commas but keys
//! may not. Neither may contain a newline. Nothing is escaped; request
//! validation keeps those bytes out (see `protocol::validate_command`).

use crate::memtable::Entry;

/// Field separator between key and value
pub const DELIMITER: u8 = b',';

/// Record terminator
pub const TERMINATOR: u8 = b'\n';

/// Append `key,value\n` to `buf`
pub fn encode_into(key: &str, value: &str, buf: &mut Vec<u8>) {
    buf.reserve(key.len() + value.len() + 2);
    buf.extend_from_slice(key.as_bytes());
    buf.push(DELIMITER);
    buf.extend_from_slice(value.as_bytes());
    buf.push(TERMINATOR);
}

/// Encode a single record line
pub fn encode(key: &str, value: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(key, value, &mut buf);
    buf
}

/// Decode one line (with or without its terminator).
///
/// Returns `None` for malformed lines: no delimiter, or not UTF-8.
/// A trailing `\r` is dropped along with the newline.
pub fn decode(line: &[u8]) -> Option<Entry> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let split = line.iter().position(|&b| b == DELIMITER)?;
    let key = std::str::from_utf8(&line[..split]).ok()?;
    let value = std::str::from_utf8(&line[split + 1..]).ok()?;

    Some(Entry::new(key, value))
}

/// Whether a key/value pair survives an encode/decode cycle unchanged
pub fn is_encodable(key: &str, value: &str) -> bool {
    let key_ok = !key.bytes().any(|b| b == DELIMITER || b == TERMINATOR || b == b'\r');
    let value_ok = !value.bytes().any(|b| b == TERMINATOR) && !value.ends_with('\r');
    key_ok && value_ok
}
