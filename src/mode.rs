//! Most frequent elements of a sequence

use crate::ChainedMap;

/// Finds the mode of `sequence`: every element sharing the highest frequency,
/// together with that frequency.
///
/// Runs in a single pass, counting occurrences in a [`ChainedMap`]. Tied elements are
/// all returned, in the map's traversal order. An empty sequence yields `(vec![], 0)`.
///
/// ```rust
/// use primehash::find_mode;
///
/// let (modes, frequency) = find_mode(["apple", "apple", "grape", "melon", "peach"]);
/// assert_eq!(modes, vec!["apple".to_string()]);
/// assert_eq!(frequency, 2);
/// ```
#[must_use]
pub fn find_mode<I>(sequence: I) -> (Vec<String>, usize)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts: ChainedMap<usize> = ChainedMap::new();
    let mut highest = 0;

    for item in sequence {
        let item = item.as_ref();
        let frequency = counts.get(item).map_or(1, |count| count.saturating_add(1));
        counts.put(item, frequency);
        highest = highest.max(frequency);
    }

    let modes = counts
        .get_keys_and_values()
        .into_iter()
        .filter(|&(_, &frequency)| frequency == highest)
        .map(|(element, _)| element.to_owned())
        .collect();

    (modes, highest)
}
