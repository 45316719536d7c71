use std::{fmt, mem};

use log::{debug, trace, warn};

use crate::{
    chain::{self, Chain},
    hasher::{AdditiveHasher, KeyHasher, bucket_index},
    prime::{next_prime, prime_capacity},
};

/// Default number of buckets for `new()`
const DEFAULT_CAPACITY: usize = 11;

/// Load factor, as a percentage, at which `put` doubles the table
const DEFAULT_LOAD_FACTOR_THRESHOLD: usize = 100;

/// Highest accepted load factor threshold
const MAX_LOAD_FACTOR_THRESHOLD: usize = 1000;

/// A hash map resolving collisions by separate chaining.
///
/// Each bucket owns a singly linked chain of entries whose keys hash to it. The bucket
/// array length is always prime. Removal unlinks the node, so there is no tombstone
/// bookkeeping.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct ChainedMap<V, H = AdditiveHasher> {
    /// One chain per bucket
    buckets: Vec<Chain<V>>,
    /// Number of entries across all chains
    size: usize,
    /// Hash function used to place keys
    hasher: H,
    /// Load factor before resizing - stored as percentage
    load_factor_threshold: usize,
}

impl<V> ChainedMap<V> {
    /// Creates an empty map with 11 buckets and the additive hash function
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map with at least `capacity` buckets, rounded up to a prime
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, AdditiveHasher)
    }
}

impl<V> Default for ChainedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H: KeyHasher> ChainedMap<V, H> {
    /// Creates an empty map with at least `capacity` buckets using `hasher` to place keys
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            buckets: empty_buckets(next_prime(capacity)),
            size: 0,
            hasher,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }

    /// Sets the load factor percentage at which `put` grows the table, clamped to 1..=1000
    pub fn set_load_factor_threshold(&mut self, threshold: usize) {
        self.load_factor_threshold = threshold.clamp(1, MAX_LOAD_FACTOR_THRESHOLD);
    }

    /// Gets the bucket index for a key
    fn bucket_of(&self, key: &str) -> usize {
        let index = bucket_index(self.hasher.hash_key(key), self.buckets.len());
        debug_assert!(index < self.buckets.len(), "bucket index {index} out of range");
        index
    }

    /// Gets the chain a key belongs to
    fn bucket_mut(&mut self, key: &str) -> Option<&mut Chain<V>> {
        let index = self.bucket_of(key);
        self.buckets.get_mut(index)
    }

    /// Inserts or updates a key-value pair.
    ///
    /// Doubles the capacity first when the load factor is at or above the threshold
    /// (1.0 by default). New keys are appended to the end of their bucket's chain.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        let threshold = self.buckets.len().saturating_mul(self.load_factor_threshold);
        if self.size.saturating_mul(100) >= threshold {
            self.resize_table(self.buckets.len().saturating_mul(2));
        }

        let key = key.into();
        let Some(chain) = self.bucket_mut(&key) else {
            warn!("no bucket for key {key:?}, entry not stored");
            return;
        };

        if chain.insert(key, value).is_none() {
            self.size = self.size.saturating_add(1);
        }
    }

    /// Retrieve a value for a given key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets.get(self.bucket_of(key))?.find(key)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.bucket_mut(key)?.find_mut(key)
    }

    /// Returns true if the map holds `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Unlinks the entry for `key` and returns its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.bucket_mut(key)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(removed)
    }

    /// Rebuilds the table with `new_capacity` buckets (rounded up to a prime) and
    /// re-inserts every entry, walking each old chain in link order.
    ///
    /// Does nothing if `new_capacity` is zero.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            return;
        }

        let capacity = prime_capacity(new_capacity);
        debug!(
            "resizing chained table from {} to {} buckets ({} entries)",
            self.buckets.len(),
            capacity,
            self.size
        );

        let old_buckets = mem::replace(&mut self.buckets, empty_buckets(capacity));
        self.size = 0;

        for (key, value) in old_buckets.into_iter().flatten() {
            self.put(key, value);
        }
    }

    /// Returns the number of entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the current load factor: entries divided by buckets
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Number of buckets whose chain is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Removes every entry, keeping the capacity
    pub fn clear(&mut self) {
        trace!("clearing chained table of {} buckets", self.buckets.len());
        self.buckets = empty_buckets(self.buckets.len());
        self.size = 0;
    }

    /// Returns every key-value pair, bucket by bucket
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter().collect()
    }

    /// Returns an iterator over the key-value pairs
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), chain: None }
    }
}

impl<V, H: KeyHasher> Extend<(String, V)> for ChainedMap<V, H> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V> FromIterator<(String, V)> for ChainedMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, V, H: KeyHasher> IntoIterator for &'a ChainedMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug, H> fmt::Display for ChainedMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            write!(f, "{index}:")?;
            for (key, value) in chain.iter() {
                write!(f, " -> ({key}: {value:?})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Allocates `capacity` empty chains
fn empty_buckets<V>(capacity: usize) -> Vec<Chain<V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Chain::new);
    buckets
}

/// Iterator over the key-value pairs of a [`ChainedMap`], bucket by bucket
#[derive(Debug)]
pub struct Iter<'a, V> {
    /// Buckets not yet visited
    buckets: std::slice::Iter<'a, Chain<V>>,
    /// Chain currently being walked
    chain: Option<chain::Iter<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.as_mut().and_then(Iterator::next) {
                return Some(item);
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hasher::PositionalHasher, prime::is_prime};

    #[test]
    fn test_put_and_get() {
        let mut map = ChainedMap::new();
        map.put("key1", 10);
        map.put("key2", 20);

        assert_eq!(map.get("key1"), Some(&10));
        assert_eq!(map.get("key2"), Some(&20));
        assert_eq!(map.get("key3"), None);
        assert!(map.contains_key("key1"));
        assert!(!map.contains_key("key3"));
    }

    #[test]
    fn test_update_keeps_size() {
        let mut map = ChainedMap::with_capacity(53);
        map.put("key1", 10);
        map.put("key1", 30);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key1"), Some(&30));
    }

    #[test]
    fn test_colliding_keys_share_a_chain() {
        let mut map = ChainedMap::with_capacity(11);
        map.put("abc", 1);
        map.put("bca", 2);
        map.put("cab", 3);

        assert_eq!(map.len(), 3);
        assert_eq!(map.empty_buckets(), 10);
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["abc", "bca", "cab"]);
    }

    #[test]
    fn test_remove() {
        let mut map = ChainedMap::new();
        map.put("abc", 1);
        map.put("bca", 2);

        assert_eq!(map.remove("abc"), Some(1));
        assert_eq!(map.remove("abc"), None);
        assert!(!map.contains_key("abc"));
        assert_eq!(map.get("bca"), Some(&2));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove("missing"), None);
    }

    #[test]
    fn test_resize_when_full() {
        let mut map = ChainedMap::with_capacity(11);
        for i in 1..=11 {
            map.put(i.to_string(), i);
        }
        assert_eq!(map.capacity(), 11);
        assert!((map.table_load() - 1.0).abs() < f64::EPSILON);

        // load factor 1.0 doubles to 22 -> 23 before the twelfth insert
        map.put("12", 12);
        assert_eq!(map.capacity(), 23);
        for i in 1..=12 {
            assert_eq!(map.get(&i.to_string()), Some(&i));
        }
    }

    #[test]
    fn test_resize_small_table_keeps_keys() {
        let mut map = ChainedMap::with_capacity(3);
        for i in 1..=5 {
            map.put(i.to_string(), i);
        }
        assert!(is_prime(map.capacity()));
        assert!(map.capacity() >= 7);
        for i in 1..=5 {
            assert_eq!(map.get(&i.to_string()), Some(&i));
        }
    }

    #[test]
    fn test_resize_table_rules() {
        let mut map = ChainedMap::with_capacity(23);
        map.put("key1", 10);
        map.put("key2", 20);

        map.resize_table(0);
        assert_eq!(map.capacity(), 23);

        map.resize_table(30);
        assert_eq!(map.capacity(), 31);

        map.resize_table(1);
        assert!(is_prime(map.capacity()));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("key1"), Some(&10));
        assert_eq!(map.get("key2"), Some(&20));
    }

    #[test]
    fn test_clear() {
        let mut map = ChainedMap::with_capacity(53);
        for i in 0..100 {
            map.put(format!("key{i}"), i);
        }
        let capacity = map.capacity();

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.empty_buckets(), capacity);
    }

    #[test]
    fn test_get_keys_and_values() {
        let mut map = ChainedMap::with_capacity_and_hasher(7, PositionalHasher);
        map.put("a", 1);
        map.put("b", 2);
        map.put("c", 3);
        assert_eq!(map.remove("b"), Some(2));

        let mut pairs = map.get_keys_and_values();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![("a", &1), ("c", &3)]);
    }

    #[test]
    fn test_get_mut() {
        let mut map = ChainedMap::new();
        map.put("key1", 1);
        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }
        assert_eq!(map.get("key1"), Some(&11));
    }

    #[test]
    fn test_high_load_threshold() {
        let mut map = ChainedMap::with_capacity(5);
        map.set_load_factor_threshold(300);
        for i in 0..15 {
            map.put(i.to_string(), i);
        }
        assert_eq!(map.capacity(), 5);
        assert!((map.table_load() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_put_many_with_positional_hash() {
        let mut map = ChainedMap::with_capacity_and_hasher(41, PositionalHasher);
        for i in 0..50 {
            map.put(format!("str{}", i / 3), i * 100);
        }
        assert_eq!(map.len(), 17);
        assert_eq!(map.capacity(), 41);
        assert_eq!(map.get("str0"), Some(&200));
    }

    #[test]
    fn test_display() {
        let mut map = ChainedMap::with_capacity(3);
        map.put("a", 1);
        let rendered = map.to_string();
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("1: -> (a: 1)"));
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut map: ChainedMap<i32> = vec![("a".to_string(), 1)].into_iter().collect();
        map.extend(vec![("b".to_string(), 2), ("a".to_string(), 3)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
    }

    #[test]
    fn test_fill_checkpoints() {
        // (empty buckets, size, capacity) after every 25 inserts
        let expected = [(39, 25, 53), (39, 50, 53), (82, 75, 107), (79, 100, 107), (184, 125, 223), (181, 150, 223)];
        let mut map = ChainedMap::with_capacity(53);
        let mut checkpoints = Vec::new();
        for i in 0..150 {
            map.put(format!("str{i}"), i * 100);
            if i % 25 == 24 {
                checkpoints.push((map.empty_buckets(), map.len(), map.capacity()));
            }
        }
        assert_eq!(checkpoints, expected);
    }

    #[test]
    fn test_fill_checkpoints_positional() {
        let expected = [(37, 4), (34, 7), (31, 10), (28, 14), (26, 17)];
        let mut map = ChainedMap::with_capacity_and_hasher(41, PositionalHasher);
        let mut checkpoints = Vec::new();
        for i in 0..50 {
            map.put(format!("str{}", i / 3), i * 100);
            if i % 10 == 9 {
                checkpoints.push((map.empty_buckets(), map.len()));
            }
        }
        assert_eq!(checkpoints, expected);
    }

    #[test]
    fn test_update_walks_existing_chain() {
        // every key lands in bucket 0, so updates must find keys deep in one chain
        let mut map = ChainedMap::with_capacity_and_hasher(7, |_: &str| 0u64);
        for i in 0..5 {
            map.put(i.to_string(), i);
        }
        for i in 0..5 {
            map.put(i.to_string(), i * 10);
        }
        assert_eq!(map.len(), 5);
        assert_eq!(map.empty_buckets(), 6);
        for i in 0..5 {
            assert_eq!(map.get(&i.to_string()), Some(&(i * 10)));
        }
    }

    #[test]
    fn test_extreme_hashes_stay_in_range() {
        let mut map = ChainedMap::with_capacity_and_hasher(11, |key: &str| u64::MAX - key.len() as u64);
        for key in ["a", "bb", "ccc", "dddd"] {
            map.put(key, key.len());
        }
        assert_eq!(map.len(), 4);
        for key in ["a", "bb", "ccc", "dddd"] {
            assert_eq!(map.get(key), Some(&key.len()));
            assert_eq!(map.remove(key), Some(key.len()));
        }
        assert!(map.is_empty());
    }
}
