//! Key hashing strategies.
//!
//! A map takes its hash function as a type parameter implementing [`KeyHasher`].
//! The two string hashes here are deliberately simple and deterministic, which keeps
//! bucket placement reproducible across runs; [`SipKeyHasher`] is there when a
//! better spread matters more than reproducibility of collisions.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Maps a string key to a non-negative integer.
///
/// Implementations must be pure: the same key always hashes to the same value.
pub trait KeyHasher {
    /// Hashes `key`
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sums the code points of the key.
///
/// Anagrams collide, which makes it handy for exercising collision handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdditiveHasher;

impl KeyHasher for AdditiveHasher {
    fn hash_key(&self, key: &str) -> u64 {
        key.chars().fold(0u64, |hash, c| hash.wrapping_add(u64::from(c)))
    }
}

/// Sums the code points of the key weighted by their 1-based position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionalHasher;

impl KeyHasher for PositionalHasher {
    fn hash_key(&self, key: &str) -> u64 {
        (1u64..)
            .zip(key.chars())
            .fold(0u64, |hash, (position, c)| hash.wrapping_add(position.wrapping_mul(u64::from(c))))
    }
}

/// SipHash via the standard library's `DefaultHasher`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SipKeyHasher;

impl KeyHasher for SipKeyHasher {
    fn hash_key(&self, key: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }
}

/// Reduces a hash to a bucket index in `0..capacity`.
///
/// `capacity` must be non-zero; tables never hold fewer than two buckets.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    // the remainder is below `capacity`, so it always fits back into a usize
    (hash % capacity as u64) as usize
}
