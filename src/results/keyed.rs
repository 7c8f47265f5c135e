use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::RowKey;

/// Map keyed by a result column, iterating in first-seen key order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRows<T> {
    index: HashMap<RowKey, usize>,
    entries: Vec<(RowKey, T)>,
}

impl<T> Default for KeyedRows<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> KeyedRows<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, key: RowKey, value: T) -> Option<T> {
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Mutable access to the value under `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(&mut self, key: RowKey, default: impl FnOnce() -> T) -> &mut T {
        let pos = if let Some(&pos) = self.index.get(&key) {
            pos
        } else {
            let pos = self.entries.len();
            self.index.insert(key.clone(), pos);
            self.entries.push((key, default()));
            pos
        };
        &mut self.entries[pos].1
    }

    #[must_use]
    pub fn get(&self, key: impl Into<RowKey>) -> Option<&T> {
        self.index
            .get(&key.into())
            .map(|&pos| &self.entries[pos].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RowKey, &T)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<T> IntoIterator for KeyedRows<T> {
    type Item = (RowKey, T);
    type IntoIter = std::vec::IntoIter<(RowKey, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T: Serialize> Serialize for KeyedRows<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
