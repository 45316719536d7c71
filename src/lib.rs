//! # Prime Hash
//!
//! String-keyed hash maps whose tables are always sized to a prime number.
//!
//! This crate provides two hash map implementations:
//!
//! - `OpenAddressingMap`: a single slot array with quadratic probing and tombstone deletion
//! - `ChainedMap`: an array of buckets, each owning a linked chain of entries
//!
//! Both take their hash function as a [`KeyHasher`] and double their capacity (moving up
//! to the next prime) once the load factor reaches a threshold: 0.5 for open addressing,
//! 1.0 for chaining. The [`HashTable`] trait drives either one through the same interface,
//! and [`find_mode`] uses a `ChainedMap` to count the most frequent elements of a sequence.
//!
//! ## Basic Usage
//!
//! ```rust
//! use primehash::OpenAddressingMap;
//!
//! // Create a map with at least 11 slots
//! let mut map = OpenAddressingMap::with_capacity(11);
//!
//! // Insert values
//! map.put("apple", 1);
//! map.put("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.put("apple", 10);
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values; the slot keeps a tombstone until the next resize
//! assert!(map.remove("apple"));
//! assert_eq!(map.get("apple"), None);
//! assert_eq!(map.len(), 1);
//! ```
//!
//! ## Choosing a Hash Function
//!
//! ```rust
//! use primehash::{ChainedMap, PositionalHasher};
//!
//! let mut map = ChainedMap::with_capacity_and_hasher(41, PositionalHasher);
//! for i in 0..50 {
//!     map.put(format!("str{}", i / 3), i * 100);
//! }
//!
//! assert_eq!(map.len(), 17);
//! assert_eq!(map.capacity(), 41);
//! assert!(map.empty_buckets() < 41);
//! ```

/// Singly linked chains used as buckets by the chaining map
mod chain;
/// Module implementing a hash map with separate chaining
mod chained;
/// Error type for fallible insertions
mod error;
/// Key hashing strategies
mod hasher;
/// Mode finding on top of the chaining map
mod mode;
/// Module implementing a hash map with quadratic probing
mod open_addressing;
/// Prime number helpers for table sizing
mod prime;
/// Common interface over both map implementations
mod utils;

pub use chained::{ChainedMap, Iter as ChainedIter};
pub use error::{MapError, Result};
pub use hasher::{AdditiveHasher, KeyHasher, PositionalHasher, SipKeyHasher};
pub use mode::find_mode;
pub use open_addressing::{EntryRef, Iter as OpenAddressingIter, OpenAddressingMap};
pub use prime::{is_prime, next_prime};
pub use utils::HashTable;
