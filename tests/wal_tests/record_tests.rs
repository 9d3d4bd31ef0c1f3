//! Tests for WalRecord
//!
//! These tests verify:
//! - Line serialization
//! - Parsing, including values that contain the delimiter
//! - Rejection of malformed lines

use lsmkv::wal::WalRecord;

#[test]
fn test_serialize_is_one_line() {
    let record = WalRecord::new("user:1", "alice");
    assert_eq!(record.serialize(), b"user:1,alice\n".to_vec());
}

#[test]
fn test_deserialize_valid_line() {
    let record = WalRecord::deserialize(b"k,v\n").unwrap();
    assert_eq!(record, WalRecord::new("k", "v"));
}

#[test]
fn test_deserialize_without_newline() {
    let record = WalRecord::deserialize(b"k,v").unwrap();
    assert_eq!(record, WalRecord::new("k", "v"));
}

#[test]
fn test_value_may_contain_commas() {
    let record = WalRecord::new("csv", "1,2,3");
    let parsed = WalRecord::deserialize(&record.serialize()).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn test_empty_value_parses() {
    let record = WalRecord::deserialize(b"key,\n").unwrap();
    assert_eq!(record.value, "");
}

#[test]
fn test_line_without_delimiter_is_malformed() {
    assert_eq!(WalRecord::deserialize(b"garbage\n"), None);
    assert_eq!(WalRecord::deserialize(b"\n"), None);
}

#[test]
fn test_invalid_utf8_is_malformed() {
    assert_eq!(WalRecord::deserialize(&[0xc3, 0x28, b',', b'v', b'\n']), None);
}
