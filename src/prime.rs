//! Prime sizing for bucket arrays.
//!
//! Both map variants keep their table length prime so that `hash % capacity`
//! spreads keys sharing common factors across the whole table.

/// Returns `true` if `n` is prime.
///
/// Trial division over odd factors up to `sqrt(n)`. `0` and `1` are not prime.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }

    let mut factor: usize = 3;
    while factor.saturating_mul(factor) <= n {
        if n % factor == 0 {
            return false;
        }
        factor += 2;
    }
    true
}

/// Returns the smallest prime at or above `n`.
///
/// Even inputs are bumped to the next odd number first, so `next_prime(2)` is `3`.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n.saturating_add(1) } else { n };
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }
    candidate
}

/// Capacity a table should use when asked for `requested` buckets.
///
/// Primes are kept as they are, everything else moves up to the next prime.
#[must_use]
pub(crate) fn prime_capacity(requested: usize) -> usize {
    if is_prime(requested) { requested } else { next_prime(requested) }
}
