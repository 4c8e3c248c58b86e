//! Deterministic key-value interface and adapters.

use std::collections::BTreeMap;

/// Byte-keyed deterministic store.
///
/// The surrounding execution model guarantees single-writer semantics per
/// state transition and rolls the whole transition back on failure;
/// implementations only need read-your-writes consistency within one call
/// and key-ordered prefix iteration.
pub trait Kv {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn set(&mut self, key: &[u8], value: &[u8]);
    fn delete(&mut self, key: &[u8]);
    /// All live `(key, value)` pairs under `prefix`, in ascending key order.
    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

/// In-memory reference backend.
///
/// BTreeMap keeps iteration order deterministic across replicas.
#[derive(Debug, Default, Clone)]
pub struct MemKv {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Kv for MemKv {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.entries.insert(key.to_vec(), value.to_vec());
    }

    fn delete(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Write-buffering overlay over a base store.
///
/// Reads see buffered writes first; nothing touches the base until
/// [`Overlay::commit`]. Dropping the overlay discards every buffered write,
/// which is how the execution coordinator gets all-or-nothing message
/// dispatch.
pub struct Overlay<'a> {
    base: &'a mut dyn Kv,
    /// `None` marks a buffered deletion.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> Overlay<'a> {
    pub fn new(base: &'a mut dyn Kv) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Apply all buffered writes to the base store.
    pub fn commit(self) {
        for (key, write) in self.writes {
            match write {
                Some(value) => self.base.set(&key, &value),
                None => self.base.delete(&key),
            }
        }
    }
}

impl Kv for Overlay<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(write) => write.clone(),
            None => self.base.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn iter_prefix(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut merged: BTreeMap<Vec<u8>, Option<Vec<u8>>> = self
            .base
            .iter_prefix(prefix)
            .into_iter()
            .map(|(k, v)| (k, Some(v)))
            .collect();
        for (k, w) in self.writes.range(prefix.to_vec()..) {
            if !k.starts_with(prefix) {
                break;
            }
            merged.insert(k.clone(), w.clone());
        }
        merged
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect()
    }
}
