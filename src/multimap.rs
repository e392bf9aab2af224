// A separate-chaining hash table whose keys fan out to an ordered list of values.
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};


/// Smallest number of buckets a table is created with.
pub const DEFAULT_CAPACITY: usize = 7;
/// When size / capacity goes above this, the table is rehashed into twice as many buckets.
pub const MAX_LOAD_FACTOR: f64 = 5.0;

fn bucket_index<K: Hash>(key: &K, capacity: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    ((hasher.finish() & 0x7fff_ffff) as usize) % capacity
}

#[derive(Debug, Clone)]
struct Chain<K, V> {
    key: K,
    values: Vec<V>,
}

#[derive(Debug, Clone)]
pub struct KeyedMultiMap<K, V> {
    buckets: Vec<Vec<Chain<K, V>>>,
    // number of key-value pairs
    size: usize,
    key_count: usize,
    // if true, putting an existing key overwrites its first value instead of appending
    replace_values: bool,
    rehash_count: usize,
    min_key: Option<K>,
    max_key: Option<K>,
}

impl<K, V> KeyedMultiMap<K, V> where K: Hash + Ord + Clone {
    pub fn new() -> KeyedMultiMap<K, V> {
        Self::with_capacity(DEFAULT_CAPACITY, false)
    }

    /// A table where each key holds a single value, overwritten on every put.
    pub fn replacing() -> KeyedMultiMap<K, V> {
        Self::with_capacity(DEFAULT_CAPACITY, true)
    }

    pub fn with_capacity(capacity: usize, replace_values: bool) -> KeyedMultiMap<K, V> {
        let capacity = std::cmp::max(DEFAULT_CAPACITY, capacity);
        KeyedMultiMap {
            buckets: (0..capacity).map(|_| Vec::new()).collect(),
            size: 0,
            key_count: 0,
            replace_values,
            rehash_count: 0,
            min_key: None,
            max_key: None,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn key_count(&self) -> usize {
        self.key_count
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    pub fn rehash_count(&self) -> usize {
        self.rehash_count
    }

    pub fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
        if self.load_factor() > MAX_LOAD_FACTOR {
            self.rehash();
        }
    }

    fn insert(&mut self, key: K, value: V) {
        let idx = bucket_index(&key, self.buckets.len());
        let replace = self.replace_values;
        match self.buckets[idx].iter().position(|chain| chain.key == key) {
            Some(pos) => {
                let values = &mut self.buckets[idx][pos].values;
                if replace {
                    // the number of pairs doesn't change when a value is replaced
                    values[0] = value;
                    return;
                }
                values.push(value);
            }
            None => {
                self.track_key_bounds(&key);
                self.buckets[idx].push(Chain{key, values: vec![value]});
                self.key_count += 1;
            }
        }
        self.size += 1;
    }

    fn track_key_bounds(&mut self, key: &K) {
        match &self.min_key {
            Some(min_key) if min_key <= key => (),
            _ => self.min_key = Some(key.clone()),
        }
        match &self.max_key {
            Some(max_key) if max_key >= key => (),
            _ => self.max_key = Some(key.clone()),
        }
    }

    /// Doubles the number of buckets.  Chains are moved whole, so each key keeps its values in
    /// insertion order.
    fn rehash(&mut self) {
        let new_capacity = self.buckets.len() * 2;
        let old_buckets = std::mem::replace(&mut self.buckets,
                                            (0..new_capacity).map(|_| Vec::new()).collect());
        for chain in old_buckets.into_iter().flatten() {
            let idx = bucket_index(&chain.key, new_capacity);
            self.buckets[idx].push(chain);
        }
        self.rehash_count += 1;
        log::debug!("rehashed table of {} pairs to {} buckets", self.size, new_capacity);
    }

    fn chain(&self, key: &K) -> Option<&Chain<K, V>> {
        let idx = bucket_index(key, self.buckets.len());
        self.buckets[idx].iter().find(|chain| chain.key == *key)
    }

    /// Returns the first value put under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.chain(key).and_then(|chain| chain.values.first())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.chain(key).is_some()
    }

    /// All values under `key`, in insertion order.  An absent key gives an empty iterator; the
    /// iterator can be cloned to restart it.
    pub fn values_of(&self, key: &K) -> std::slice::Iter<'_, V> {
        match self.chain(key) {
            Some(chain) => chain.values.iter(),
            None => {
                let empty: &[V] = &[];
                empty.iter()
            }
        }
    }

    pub fn value_count_of(&self, key: &K) -> usize {
        self.chain(key).map_or(0, |chain| chain.values.len())
    }

    /// Removes `key` and all of its values, returning them.  Does nothing if the key is absent.
    pub fn delete(&mut self, key: &K) -> Option<Vec<V>> {
        let idx = bucket_index(key, self.buckets.len());
        let pos = self.buckets[idx].iter().position(|chain| chain.key == *key)?;
        let chain = self.buckets[idx].remove(pos);
        self.size -= chain.values.len();
        self.key_count -= 1;
        if self.min_key.as_ref() == Some(key) || self.max_key.as_ref() == Some(key) {
            self.min_key = self.keys().min().cloned();
            self.max_key = self.keys().max().cloned();
        }
        Some(chain.values)
    }

    pub fn min_key(&self) -> Option<&K> {
        self.min_key.as_ref()
    }

    pub fn max_key(&self) -> Option<&K> {
        self.max_key.as_ref()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.buckets.iter().flatten().map(|chain| &chain.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> + '_ {
        self.buckets.iter().flatten().map(|chain| (&chain.key, chain.values.as_slice()))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.buckets.iter().flatten().flat_map(|chain| chain.values.iter())
    }
}

impl<K, V> KeyedMultiMap<K, V> where K: Hash + Ord + Clone, V: Ord {
    pub fn min_value(&self) -> Option<&V> {
        self.values().min()
    }

    pub fn max_value(&self) -> Option<&V> {
        self.values().max()
    }
}

impl<K, V> Default for KeyedMultiMap<K, V> where K: Hash + Ord + Clone {
    fn default() -> Self {
        Self::new()
    }
}
