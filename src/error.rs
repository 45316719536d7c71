//! Error type for the fallible map operations

use thiserror::Error;

/// Errors reported by map operations that can refuse an insertion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Every slot on the key's quadratic probe sequence is occupied by another live key
    #[error("probe sequence for key {key:?} exhausted after {capacity} attempts")]
    ProbeExhausted {
        /// The key that could not be placed
        key: String,
        /// Table capacity at the time of the attempt
        capacity: usize,
    },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, MapError>;
