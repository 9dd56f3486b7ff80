//! Generic keyed cache for loaded assets.

use std::collections::HashMap;
use std::hash::Hash;

pub struct AssetCache<K, V> {
    cache: HashMap<K, V>,
}

impl<K, V> AssetCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        AssetCache {
            cache: HashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.cache.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.cache.insert(key, value);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<K, V> Default for AssetCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
