//! Keyed Store
//!
//! The only persistence layer the engine sees: an ordered byte-keyed map
//! with get, set, delete and prefix scans. Hosts plug in their own engine;
//! [`MemoryStore`] backs tests and the demo.

pub mod codec;

use std::collections::BTreeMap;

pub use codec::{decode_record, encode_record, CodecError, LENGTH_PREFIX_LEN};

/// Key/value pair yielded by a prefix scan.
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Ordered byte-keyed map.
///
/// Writes are infallible at this level. A host whose backend can fail must
/// surface that failure from its own transaction commit, which rolls back
/// everything the operation did.
pub trait KeyValueStore {
    /// Read the value under `key`.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Overwrite the value under `key`.
    fn set(&mut self, key: &[u8], value: Vec<u8>);

    /// Remove `key`. Returns whether it was present.
    fn delete(&mut self, key: &[u8]) -> bool;

    /// Scan every entry whose key starts with `prefix`, in key-byte order.
    fn prefix_iter<'a>(&'a self, prefix: &'a [u8]) -> Box<dyn Iterator<Item = KvPair> + 'a>;

    /// True when a value exists under `key`.
    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> bool {
        (**self).delete(key)
    }

    fn prefix_iter<'a>(&'a self, prefix: &'a [u8]) -> Box<dyn Iterator<Item = KvPair> + 'a> {
        (**self).prefix_iter(prefix)
    }

    fn has(&self, key: &[u8]) -> bool {
        (**self).has(key)
    }
}

/// In-memory store over a BTreeMap.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.entries.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) -> bool {
        self.entries.remove(key).is_some()
    }

    fn prefix_iter<'a>(&'a self, prefix: &'a [u8]) -> Box<dyn Iterator<Item = KvPair> + 'a> {
        Box::new(
            self.entries
                .range(prefix.to_vec()..)
                .take_while(move |(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    fn has(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }
}
