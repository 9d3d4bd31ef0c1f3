//! Tests for WalReader
//!
//! These tests verify:
//! - Reading records in file order
//! - Classification of malformed and torn lines
//! - The record iterator skipping bad lines

use std::fs;
use std::path::PathBuf;

use lsmkv::wal::{LogLine, WalReader, WalRecord};
use lsmkv::LsmError;
use tempfile::TempDir;

fn write_wal(contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("wal.log");
    fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

#[test]
fn test_open_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = WalReader::open(&temp_dir.path().join("missing.log"));
    assert!(matches!(result, Err(LsmError::Io(_))));
}

#[test]
fn test_read_empty_file() {
    let (_temp, path) = write_wal(b"");
    let mut reader = WalReader::open(&path).unwrap();
    assert_eq!(reader.next_line().unwrap(), None);
}

#[test]
fn test_read_records_in_order() {
    let (_temp, path) = write_wal(b"b,2\na,1\nb,3\n");
    let records: Vec<WalRecord> = WalReader::open(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        records,
        vec![
            WalRecord::new("b", "2"),
            WalRecord::new("a", "1"),
            WalRecord::new("b", "3"),
        ]
    );
}

#[test]
fn test_classifies_malformed_line() {
    let (_temp, path) = write_wal(b"a,1\nbroken\nb,2\n");
    let mut reader = WalReader::open(&path).unwrap();

    assert_eq!(
        reader.next_line().unwrap(),
        Some(LogLine::Record(WalRecord::new("a", "1")))
    );
    assert_eq!(reader.next_line().unwrap(), Some(LogLine::Malformed { offset: 4 }));
    assert_eq!(
        reader.next_line().unwrap(),
        Some(LogLine::Record(WalRecord::new("b", "2")))
    );
    assert_eq!(reader.next_line().unwrap(), None);
    assert_eq!(reader.position(), 15);
}

#[test]
fn test_classifies_torn_tail() {
    let (_temp, path) = write_wal(b"a,1\nb,par");
    let mut reader = WalReader::open(&path).unwrap();

    reader.next_line().unwrap();
    assert_eq!(reader.next_line().unwrap(), Some(LogLine::Torn { offset: 4 }));
    assert_eq!(reader.next_line().unwrap(), None);
}

#[test]
fn test_iterator_skips_bad_lines() {
    let (_temp, path) = write_wal(b"a,1\nnodelim\nb,2\nc,tor");
    let records: Vec<WalRecord> = WalReader::open(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records, vec![WalRecord::new("a", "1"), WalRecord::new("b", "2")]);
}
