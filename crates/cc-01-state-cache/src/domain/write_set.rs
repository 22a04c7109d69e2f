//! Insertion-ordered write overlay shared by the cache layers.

use std::collections::{BTreeMap, HashMap};

use shared_types::proto::WriteElement;
use shared_types::KeyValue;

/// A pending write: a value or a tombstone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWrite {
    pub value: Vec<u8>,
    pub deleted: bool,
}

/// Uncommitted writes in insertion order. Rewriting a key keeps its original
/// position.
#[derive(Clone, Debug, Default)]
pub struct WriteSet {
    order: Vec<String>,
    entries: HashMap<String, PendingWrite>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: &str, value: Vec<u8>) {
        self.insert(key, PendingWrite { value, deleted: false });
    }

    pub fn delete(&mut self, key: &str) {
        self.insert(
            key,
            PendingWrite {
                value: Vec::new(),
                deleted: true,
            },
        );
    }

    fn insert(&mut self, key: &str, write: PendingWrite) {
        if self.entries.insert(key.to_string(), write).is_none() {
            self.order.push(key.to_string());
        }
    }

    /// `Some(Some(v))` written, `Some(None)` deleted, `None` untouched.
    pub fn lookup(&self, key: &str) -> Option<Option<&[u8]>> {
        self.entries
            .get(key)
            .map(|w| (!w.deleted).then_some(w.value.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Writes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PendingWrite)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|w| (k.as_str(), w)))
    }

    /// Writes sorted ascending by key, one element per key.
    pub fn sorted_elements(&self) -> Vec<WriteElement> {
        let mut out: Vec<WriteElement> = self
            .iter()
            .map(|(key, w)| WriteElement {
                key: key.to_string(),
                value: w.value.clone(),
                is_deleted: w.deleted,
            })
            .collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        out
    }

    /// Merge pending writes in `[start, end)` over `base` results.
    pub fn overlay_range(&self, base: Vec<KeyValue>, start: &str, end: &str) -> Vec<KeyValue> {
        let mut merged: BTreeMap<String, Vec<u8>> =
            base.into_iter().map(|kv| (kv.key, kv.value)).collect();
        for (key, w) in self.iter() {
            if key < start || key >= end {
                continue;
            }
            if w.deleted {
                merged.remove(key);
            } else {
                merged.insert(key.to_string(), w.value.clone());
            }
        }
        merged
            .into_iter()
            .map(|(key, value)| KeyValue { key, value })
            .collect()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }
}
