use std::{fmt, mem};

use log::{debug, trace, warn};

use crate::{
    error::{MapError, Result},
    hasher::{AdditiveHasher, KeyHasher, bucket_index},
    prime::{next_prime, prime_capacity},
};

/// Default number of slots for `new()`
const DEFAULT_CAPACITY: usize = 11;

/// Load factor, as a percentage, at which `put` doubles the table
const DEFAULT_LOAD_FACTOR_THRESHOLD: usize = 50;

/// Highest accepted load factor threshold; quadratic probing degrades quickly past this
const MAX_LOAD_FACTOR_THRESHOLD: usize = 90;

/// A key-value pair stored in a slot
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// State of a single slot in the table
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never used since the last resize or clear
    Empty,
    /// Held an entry that has since been removed. Probe sequences continue through it.
    Tombstone(Entry<V>),
    /// Holds a live entry
    Occupied(Entry<V>),
}

impl<V> Slot<V> {
    /// Turns a live entry into a tombstone, keeping the entry in place
    fn bury(&mut self) {
        if let Self::Occupied(entry) = mem::replace(self, Self::Empty) {
            *self = Self::Tombstone(entry);
        }
    }
}

/// Outcome of a probe for a key
enum Probe {
    /// The key lives at this index
    Live(usize),
    /// The key is absent; this is the first reusable slot on its sequence
    Vacant(usize),
    /// The key is absent and every slot on the sequence holds another live key
    Exhausted,
}

/// Quadratic probe sequence `i0, i0 + 1, i0 + 4, i0 + 9, ...` modulo the capacity.
///
/// Yields exactly `capacity` indices.
#[derive(Debug)]
struct ProbeSeq {
    /// Index to yield next
    index: usize,
    /// Number of indices yielded so far
    attempt: usize,
    /// Table capacity
    capacity: usize,
}

impl ProbeSeq {
    /// Starts a probe sequence at `start`
    const fn new(start: usize, capacity: usize) -> Self {
        Self { index: start, attempt: 0, capacity }
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<usize> {
        if self.attempt >= self.capacity {
            return None;
        }
        let current = self.index;
        self.attempt += 1;
        // (j + 1)^2 - j^2 = 2j + 1, so consecutive offsets differ by the next odd number
        let step = (2 * self.attempt - 1) % self.capacity;
        self.index = (self.index + step) % self.capacity;
        Some(current)
    }
}

/// A hash map resolving collisions by quadratic probing.
///
/// The slot array length is always prime. Removal leaves a tombstone behind so that
/// probe sequences running through the vacated slot still find keys placed after it;
/// tombstones are dropped the next time the table is resized.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressingMap<V, H = AdditiveHasher> {
    /// The slots storing the entries
    slots: Vec<Slot<V>>,
    /// Number of live entries
    size: usize,
    /// Hash function used to place keys
    hasher: H,
    /// Load factor before resizing - stored as percentage (0-100)
    load_factor_threshold: usize,
}

impl<V> OpenAddressingMap<V> {
    /// Creates an empty map with 11 slots and the additive hash function
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty map with at least `capacity` slots, rounded up to a prime
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, AdditiveHasher)
    }
}

impl<V> Default for OpenAddressingMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H: KeyHasher> OpenAddressingMap<V, H> {
    /// Creates an empty map with at least `capacity` slots using `hasher` to place keys.
    ///
    /// The capacity always moves up to the next odd prime, so `2` becomes `3`.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            slots: empty_slots(next_prime(capacity)),
            size: 0,
            hasher,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }

    /// Sets the load factor percentage at which `put` grows the table, clamped to 1..=90
    pub fn set_load_factor_threshold(&mut self, threshold: usize) {
        self.load_factor_threshold = threshold.clamp(1, MAX_LOAD_FACTOR_THRESHOLD);
    }

    /// Home slot of `key` under the current capacity
    fn home_index(&self, key: &str) -> usize {
        bucket_index(self.hasher.hash_key(key), self.slots.len())
    }

    /// Walks the probe sequence of `key` for insertion.
    ///
    /// Tombstones are remembered but skipped, since the key may live further along.
    fn probe_for_insert(&self, key: &str) -> Probe {
        let mut first_reusable = None;

        for index in ProbeSeq::new(self.home_index(key), self.slots.len()) {
            match self.slots.get(index) {
                None | Some(Slot::Empty) => {
                    return Probe::Vacant(first_reusable.unwrap_or(index));
                }
                Some(Slot::Tombstone(_)) => {
                    first_reusable.get_or_insert(index);
                }
                Some(Slot::Occupied(entry)) if entry.key == key => return Probe::Live(index),
                Some(Slot::Occupied(_)) => {}
            }
        }

        first_reusable.map_or(Probe::Exhausted, Probe::Vacant)
    }

    /// Index of the live entry for `key`.
    ///
    /// Stops at the first empty slot, or at a tombstone left by the same key.
    fn find_live(&self, key: &str) -> Option<usize> {
        for index in ProbeSeq::new(self.home_index(key), self.slots.len()) {
            match self.slots.get(index)? {
                Slot::Empty => return None,
                Slot::Tombstone(entry) if entry.key == key => return None,
                Slot::Occupied(entry) if entry.key == key => return Some(index),
                Slot::Tombstone(_) | Slot::Occupied(_) => {}
            }
        }
        None
    }

    /// Doubles the table when the load factor has reached the threshold
    #[allow(clippy::arithmetic_side_effects)]
    fn grow_if_loaded(&mut self) {
        // size / capacity >= threshold / 100, kept in integers
        let threshold = self.slots.len().saturating_mul(self.load_factor_threshold);
        if self.size.saturating_mul(100) >= threshold {
            self.resize_table(self.slots.len().saturating_mul(2));
        }
    }

    /// Places a key-value pair without checking the load factor.
    ///
    /// Hands the pair back if the probe sequence has no slot for it.
    fn place(&mut self, key: String, value: V) -> std::result::Result<(), (String, V)> {
        let index = match self.probe_for_insert(&key) {
            Probe::Live(index) | Probe::Vacant(index) => index,
            Probe::Exhausted => return Err((key, value)),
        };
        debug_assert!(index < self.slots.len(), "probe index {index} out of range");

        match self.slots.get_mut(index) {
            // an occupied slot on the insert probe always holds this key
            Some(Slot::Occupied(entry)) => entry.value = value,
            Some(slot) => {
                *slot = Slot::Occupied(Entry { key, value });
                self.size = self.size.saturating_add(1);
            }
            None => return Err((key, value)),
        }
        Ok(())
    }

    /// Inserts or updates a key-value pair.
    ///
    /// Doubles the capacity first when the load factor is at or above the threshold
    /// (50% by default). If the key's probe sequence turns out to have no free slot,
    /// the table is doubled again and the insert retried.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        self.grow_if_loaded();

        let mut pending = (key.into(), value);
        loop {
            match self.place(pending.0, pending.1) {
                Ok(()) => return,
                Err(rejected) => {
                    warn!(
                        "probe sequence for {:?} exhausted at capacity {}, growing table",
                        rejected.0,
                        self.capacity()
                    );
                    self.resize_table(self.capacity().saturating_mul(2));
                    pending = rejected;
                }
            }
        }
    }

    /// Inserts or updates a key-value pair, refusing instead of growing past the load factor check.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ProbeExhausted`] when every slot on the key's probe sequence
    /// holds a different live key. The map is left unchanged apart from a load-factor resize.
    pub fn try_put(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        self.grow_if_loaded();
        self.place(key.into(), value)
            .map_err(|(key, _)| MapError::ProbeExhausted { key, capacity: self.slots.len() })
    }

    /// Retrieve the value for a live key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        match self.slots.get(self.find_live(key)?)? {
            Slot::Occupied(entry) => Some(&entry.value),
            Slot::Empty | Slot::Tombstone(_) => None,
        }
    }

    /// Get a mutable reference to the value for a live key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find_live(key)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied(entry) => Some(&mut entry.value),
            Slot::Empty | Slot::Tombstone(_) => None,
        }
    }

    /// Returns true if a live entry exists for `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find_live(key).is_some()
    }

    /// Tombstones the entry for `key`. Returns whether a live entry was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(slot) = self.find_live(key).and_then(|index| self.slots.get_mut(index)) else {
            return false;
        };
        slot.bury();
        self.size = self.size.saturating_sub(1);
        true
    }

    /// Rebuilds the table with `new_capacity` slots (rounded up to a prime) and
    /// re-inserts every live entry. Tombstones are discarded.
    ///
    /// Does nothing if `new_capacity` is smaller than the number of live entries.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < self.size {
            return;
        }

        let capacity = prime_capacity(new_capacity);
        debug!(
            "resizing open addressing table from {} to {} slots ({} live)",
            self.slots.len(),
            capacity,
            self.size
        );

        let old_slots = mem::replace(&mut self.slots, empty_slots(capacity));
        self.size = 0;

        for slot in old_slots {
            if let Slot::Occupied(Entry { key, value }) = slot {
                self.put(key, value);
            }
        }
    }

    /// Returns the number of live entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns true if there are no live entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current load factor: live entries divided by slots
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.slots.len() as f64
    }

    /// Number of never-used slots. Tombstones do not count as empty.
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.slots.iter().filter(|slot| matches!(slot, Slot::Empty)).count()
    }

    /// Removes every entry, keeping the capacity
    pub fn clear(&mut self) {
        trace!("clearing open addressing table of {} slots", self.slots.len());
        self.slots = empty_slots(self.slots.len());
        self.size = 0;
    }

    /// Returns every live key-value pair, in slot order
    #[must_use]
    pub fn get_keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter()
            .filter(|entry| !entry.is_tombstone())
            .map(|entry| (entry.key(), entry.value()))
            .collect()
    }

    /// Returns an iterator over every non-empty slot, tombstones included
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: self.slots.iter() }
    }
}

impl<V, H> Extend<(String, V)> for OpenAddressingMap<V, H>
where
    H: KeyHasher,
{
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V> FromIterator<(String, V)> for OpenAddressingMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, V, H: KeyHasher> IntoIterator for &'a OpenAddressingMap<V, H> {
    type Item = EntryRef<'a, V>;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug, H> fmt::Display for OpenAddressingMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Tombstone(entry) => {
                    writeln!(f, "{index}: K: {} V: {:?} TS: true", entry.key, entry.value)?;
                }
                Slot::Occupied(entry) => {
                    writeln!(f, "{index}: K: {} V: {:?} TS: false", entry.key, entry.value)?;
                }
            }
        }
        Ok(())
    }
}

/// Allocates `capacity` empty slots
fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}

/// An entry seen through [`Iter`]
#[derive(Debug)]
pub struct EntryRef<'a, V> {
    /// The entry's key
    key: &'a str,
    /// The entry's value
    value: &'a V,
    /// Whether the entry has been removed
    tombstone: bool,
}

impl<'a, V> EntryRef<'a, V> {
    /// The entry's key
    #[must_use]
    pub const fn key(&self) -> &'a str {
        self.key
    }

    /// The entry's value
    #[must_use]
    pub const fn value(&self) -> &'a V {
        self.value
    }

    /// Returns true if the entry was removed and only remains as a tombstone
    #[must_use]
    pub const fn is_tombstone(&self) -> bool {
        self.tombstone
    }
}

/// Iterator over the non-empty slots of an [`OpenAddressingMap`], in slot order.
///
/// Removed entries are still yielded, flagged by [`EntryRef::is_tombstone`].
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Remaining slots
    slots: std::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = EntryRef<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| match slot {
            Slot::Empty => None,
            Slot::Tombstone(entry) => {
                Some(EntryRef { key: &entry.key, value: &entry.value, tombstone: true })
            }
            Slot::Occupied(entry) => {
                Some(EntryRef { key: &entry.key, value: &entry.value, tombstone: false })
            }
        })
    }
}
