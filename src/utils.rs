//! Common interface over both map implementations

use crate::{ChainedMap, KeyHasher, OpenAddressingMap};

/// Operations shared by [`OpenAddressingMap`] and [`ChainedMap`].
///
/// Lets callers and tests drive either collision strategy through the same code.
pub trait HashTable<V> {
    /// Inserts or updates a key-value pair
    fn put(&mut self, key: String, value: V);

    /// Returns the value stored under `key`
    fn get(&self, key: &str) -> Option<&V>;

    /// Returns true if the map holds `key`
    fn contains_key(&self, key: &str) -> bool;

    /// Removes `key`. Returns whether anything was removed.
    fn remove(&mut self, key: &str) -> bool;

    /// Rebuilds the table with at least `new_capacity` buckets
    fn resize_table(&mut self, new_capacity: usize);

    /// Number of live entries
    fn len(&self) -> usize;

    /// Number of buckets
    fn capacity(&self) -> usize;

    /// Number of empty buckets
    fn empty_buckets(&self) -> usize;

    /// Removes every entry, keeping the capacity
    fn clear(&mut self);

    /// Every live key-value pair, in no particular order
    fn get_keys_and_values(&self) -> Vec<(&str, &V)>;

    /// Returns true if the map holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entries divided by buckets
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn table_load(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Returns the keys as a Vec
    fn keys(&self) -> Vec<String> {
        self.get_keys_and_values().into_iter().map(|(k, _)| k.to_owned()).collect()
    }

    /// Returns the values as a Vec
    fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.get_keys_and_values().into_iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<V, H: KeyHasher> HashTable<V> for OpenAddressingMap<V, H> {
    fn put(&mut self, key: String, value: V) {
        Self::put(self, key, value);
    }

    fn get(&self, key: &str) -> Option<&V> {
        Self::get(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        Self::contains_key(self, key)
    }

    fn remove(&mut self, key: &str) -> bool {
        Self::remove(self, key)
    }

    fn resize_table(&mut self, new_capacity: usize) {
        Self::resize_table(self, new_capacity);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn empty_buckets(&self) -> usize {
        Self::empty_buckets(self)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
        Self::get_keys_and_values(self)
    }
}

impl<V, H: KeyHasher> HashTable<V> for ChainedMap<V, H> {
    fn put(&mut self, key: String, value: V) {
        Self::put(self, key, value);
    }

    fn get(&self, key: &str) -> Option<&V> {
        Self::get(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        Self::contains_key(self, key)
    }

    fn remove(&mut self, key: &str) -> bool {
        Self::remove(self, key).is_some()
    }

    fn resize_table(&mut self, new_capacity: usize) {
        Self::resize_table(self, new_capacity);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn empty_buckets(&self) -> usize {
        Self::empty_buckets(self)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
        Self::get_keys_and_values(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::is_prime;

    fn fill(table: &mut dyn HashTable<i32>) {
        for (key, value) in [("a", 1), ("b", 2), ("c", 3)] {
            table.put(key.to_string(), value);
        }
    }

    fn check_contract(table: &mut dyn HashTable<i32>) {
        assert!(table.is_empty());
        fill(table);
        assert_eq!(table.len(), 3);
        assert!(table.contains_key("b"));

        let mut keys = table.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        let mut values = table.values();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);

        assert!(table.remove("b"));
        assert!(!table.remove("b"));
        assert!(!table.contains_key("b"));

        table.resize_table(100);
        assert_eq!(table.capacity(), 101);
        assert!(is_prime(table.capacity()));
        assert_eq!(table.get("a"), Some(&1));
        assert!((table.table_load() - 2.0 / 101.0).abs() < f64::EPSILON);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.empty_buckets(), 101);
    }

    #[test]
    fn test_open_addressing_contract() {
        check_contract(&mut OpenAddressingMap::<i32>::new());
    }

    #[test]
    fn test_chained_contract() {
        check_contract(&mut ChainedMap::<i32>::new());
    }
}
