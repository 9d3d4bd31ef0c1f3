//! WAL record definitions

use crate::memtable::Entry;
use crate::record;

/// A single accepted Set, as logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalRecord {
    pub key: String,
    pub value: String,
}

impl WalRecord {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Serialize to a `key,value\n` line
    pub fn serialize(&self) -> Vec<u8> {
        record::encode(&self.key, &self.value)
    }

    /// Parse one line; `None` if it is malformed
    pub fn deserialize(line: &[u8]) -> Option<Self> {
        record::decode(line).map(Self::from)
    }
}

impl From<Entry> for WalRecord {
    fn from(entry: Entry) -> Self {
        Self {
            key: entry.key,
            value: entry.value,
        }
    }
}
