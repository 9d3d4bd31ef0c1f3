//! Tests for SSTable builder, reader and iterator
//!
//! These tests verify:
//! - Exact on-disk format
//! - Point lookups (hits, misses before/between/after keys)
//! - Ordering enforcement in the builder
//! - Malformed lines are skipped, missing files read as empty

use std::fs;
use std::path::PathBuf;

use lsmkv::memtable::Entry;
use lsmkv::storage::sstable::lookup;
use lsmkv::storage::{SSTableBuilder, SSTableReader};
use lsmkv::LsmError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test-0001.sst");
    (temp_dir, path)
}

fn build(path: &PathBuf, entries: &[(&str, &str)]) {
    let mut builder = SSTableBuilder::new(path).unwrap();
    for (key, value) in entries {
        builder.add(key, value).unwrap();
    }
    builder.finish().unwrap();
}

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_builder_writes_sorted_lines() {
    let (_temp, path) = setup_temp_path();
    build(&path, &[("a", "1"), ("b", "2")]);

    assert_eq!(fs::read_to_string(&path).unwrap(), "a,1\nb,2\n");
}

#[test]
fn test_builder_metadata() {
    let (_temp, path) = setup_temp_path();
    let mut builder = SSTableBuilder::new(&path).unwrap();
    builder.add("apple", "red").unwrap();
    builder.add("banana", "yellow").unwrap();
    assert_eq!(builder.entry_count(), 2);

    let sstable = builder.finish().unwrap();

    assert_eq!(sstable.path, path);
    assert_eq!(sstable.entry_count(), 2);
    assert_eq!(sstable.min_key, "apple");
    assert_eq!(sstable.max_key, "banana");
    assert_eq!(sstable.file_size, fs::metadata(&path).unwrap().len());
    assert!(sstable.might_contain("avocado"));
    assert!(!sstable.might_contain("cherry"));
}

#[test]
fn test_builder_rejects_out_of_order_keys() {
    let (_temp, path) = setup_temp_path();
    let mut builder = SSTableBuilder::new(&path).unwrap();
    builder.add("b", "2").unwrap();

    assert!(matches!(builder.add("a", "1"), Err(LsmError::Storage(_))));
    assert!(matches!(builder.add("b", "again"), Err(LsmError::Storage(_))));
}

#[test]
fn test_builder_truncates_existing_file() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, "zzz,old\nleftover,junk\n").unwrap();

    build(&path, &[("a", "1")]);

    assert_eq!(fs::read_to_string(&path).unwrap(), "a,1\n");
}

// =============================================================================
// Reader Tests
// =============================================================================

#[test]
fn test_reader_finds_every_key() {
    let (_temp, path) = setup_temp_path();
    let entries: Vec<(String, String)> = (0..101)
        .map(|i| (format!("key{:04}", i), format!("value{}", i)))
        .collect();
    let refs: Vec<(&str, &str)> = entries
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    build(&path, &refs);

    let reader = SSTableReader::open(&path).unwrap();
    assert_eq!(reader.entry_count(), 101);

    for (key, value) in &entries {
        assert_eq!(reader.get(key).unwrap().as_deref(), Some(value.as_str()));
    }
}

#[test]
fn test_reader_misses() {
    let (_temp, path) = setup_temp_path();
    build(&path, &[("b", "1"), ("d", "2"), ("f", "3")]);
    let reader = SSTableReader::open(&path).unwrap();

    assert_eq!(reader.get("a").unwrap(), None); // before first
    assert_eq!(reader.get("c").unwrap(), None); // between
    assert_eq!(reader.get("e").unwrap(), None);
    assert_eq!(reader.get("g").unwrap(), None); // after last
    assert_eq!(reader.get("").unwrap(), None);
}

#[test]
fn test_reader_min_max_and_range_check() {
    let (_temp, path) = setup_temp_path();
    build(&path, &[("m", "1"), ("p", "2")]);
    let reader = SSTableReader::open(&path).unwrap();

    assert_eq!(reader.min_key(), Some("m"));
    assert_eq!(reader.max_key(), Some("p"));
    assert!(reader.might_contain("n"));
    assert!(!reader.might_contain("a"));
    assert!(!reader.might_contain("z"));
}

#[test]
fn test_empty_sstable() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, "").unwrap();
    let reader = SSTableReader::open(&path).unwrap();

    assert_eq!(reader.entry_count(), 0);
    assert_eq!(reader.get("a").unwrap(), None);
    assert!(!reader.might_contain("a"));
}

#[test]
fn test_reader_skips_malformed_lines() {
    let (_temp, path) = setup_temp_path();
    fs::write(&path, "a,1\nnot a record\nc,3\ne,5\n").unwrap();
    let reader = SSTableReader::open(&path).unwrap();

    assert_eq!(reader.entry_count(), 3);
    assert_eq!(reader.skipped(), 1);
    assert_eq!(reader.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(reader.get("c").unwrap().as_deref(), Some("3"));
    assert_eq!(reader.get("e").unwrap().as_deref(), Some("5"));
}

#[test]
fn test_value_with_commas() {
    let (_temp, path) = setup_temp_path();
    build(&path, &[("a", "x,y,z"), ("b", "2")]);
    let reader = SSTableReader::open(&path).unwrap();

    assert_eq!(reader.get("a").unwrap().as_deref(), Some("x,y,z"));
}

#[test]
fn test_deleted_file_reads_as_empty() {
    let (_temp, path) = setup_temp_path();
    build(&path, &[("a", "1")]);
    let reader = SSTableReader::open(&path).unwrap();

    fs::remove_file(&path).unwrap();

    assert_eq!(reader.get("a").unwrap(), None);
}

// =============================================================================
// Iterator / One-shot Lookup Tests
// =============================================================================

#[test]
fn test_iter_yields_all_entries_in_order() {
    let (_temp, path) = setup_temp_path();
    build(&path, &[("a", "1"), ("b", "2"), ("c", "3")]);
    let reader = SSTableReader::open(&path).unwrap();

    let entries: Vec<Entry> = reader.iter().unwrap().collect::<Result<_, _>>().unwrap();

    assert_eq!(
        entries,
        vec![Entry::new("a", "1"), Entry::new("b", "2"), Entry::new("c", "3")]
    );
}

#[test]
fn test_lookup_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nope-0001.sst");

    assert_eq!(lookup(&path, "a").unwrap(), None);
}

#[test]
fn test_lookup_hit() {
    let (_temp, path) = setup_temp_path();
    build(&path, &[("a", "1"), ("b", "2")]);

    assert_eq!(lookup(&path, "b").unwrap().as_deref(), Some("2"));
    assert_eq!(lookup(&path, "c").unwrap(), None);
}
