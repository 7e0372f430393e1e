//! FILENAME: keyspace/src/store.rs
//! PURPOSE: The backing-store contract views observe.
//! CONTEXT: Views never own data; they borrow any container that can answer
//! containment, fetch a value by exact key, and iterate its stored pairs.
//! Values come back owned so that stores with interior mutability can
//! implement the trait too; callers with large values wrap them in Rc/Arc.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::key::Key;

/// Read contract for a backing key-value container.
pub trait KeyStore {
    type Value: Clone;

    /// True if the exact composite key is present.
    fn contains_key(&self, key: &Key) -> bool;

    /// Fetches the value stored under the exact composite key.
    /// None means the key is absent.
    fn fetch(&self, key: &Key) -> Option<Self::Value>;

    /// Iterates over every stored (key, value) pair, in no particular order.
    fn entries(&self) -> Box<dyn Iterator<Item = (Key, Self::Value)> + '_>;
}

impl<V: Clone, H: BuildHasher> KeyStore for HashMap<Key, V, H> {
    type Value = V;

    fn contains_key(&self, key: &Key) -> bool {
        HashMap::contains_key(self, key)
    }

    fn fetch(&self, key: &Key) -> Option<V> {
        self.get(key).cloned()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Key, V)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

impl<V: Clone> KeyStore for BTreeMap<Key, V> {
    type Value = V;

    fn contains_key(&self, key: &Key) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn fetch(&self, key: &Key) -> Option<V> {
        self.get(key).cloned()
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (Key, V)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}
