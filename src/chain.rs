//! Singly linked list used as a bucket by [`ChainedMap`](crate::ChainedMap)

use std::{fmt, mem};

/// A node in a bucket chain
#[derive(Debug, Clone)]
struct Node<V> {
    /// The key stored in the node
    key: String,
    /// The value associated with the key
    value: V,
    /// Next node in the chain
    next: Option<Box<Node<V>>>,
}

/// An owned chain of key-value nodes.
///
/// New nodes go to the tail, so iteration follows insertion order.
#[derive(Clone)]
pub(crate) struct Chain<V> {
    /// First node of the chain
    head: Option<Box<Node<V>>>,
    /// Number of nodes in the chain
    len: usize,
}

impl<V> Chain<V> {
    /// Creates an empty chain
    pub(crate) const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of nodes in the chain
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain has no nodes
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` under `key` in a single walk of the chain.
    ///
    /// Replaces and returns the old value if the key is present, otherwise appends a
    /// node at the tail.
    pub(crate) fn insert(&mut self, key: String, value: V) -> Option<V> {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            if node.key == key {
                return Some(mem::replace(&mut node.value, value));
            }
            cursor = &mut node.next;
        }
        *cursor = Some(Box::new(Node { key, value, next: None }));
        self.len = self.len.saturating_add(1);
        None
    }

    /// Returns the value stored under `key`
    pub(crate) fn find(&self, key: &str) -> Option<&V> {
        self.iter().find(|&(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored under `key`
    pub(crate) fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.key == key {
                return Some(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    /// Unlinks the node holding `key` and returns its value
    pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| node.key != key) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let mut removed = cursor.take()?;
        *cursor = removed.next.take();
        self.len = self.len.saturating_sub(1);
        Some(removed.value)
    }

    /// Detaches and returns the first node's key and value
    fn pop_front(&mut self) -> Option<(String, V)> {
        self.head.take().map(|node| {
            let Node { key, value, next } = *node;
            self.head = next;
            self.len = self.len.saturating_sub(1);
            (key, value)
        })
    }

    /// Iterates over the chain in link order
    pub(crate) fn iter(&self) -> Iter<'_, V> {
        Iter { next: self.head.as_deref() }
    }
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Drop for Chain<V> {
    // Unlink iteratively so long chains don't recurse through `Box` drops
    fn drop(&mut self) {
        let mut cursor = self.head.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

impl<V> IntoIterator for Chain<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}

/// Borrowing iterator over a chain
#[derive(Debug)]
pub(crate) struct Iter<'a, V> {
    /// Node to yield next
    next: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            (node.key.as_str(), &node.value)
        })
    }
}

/// Owning iterator that drains a chain front to back
#[derive(Debug)]
pub(crate) struct IntoIter<V> {
    /// The chain being drained
    chain: Chain<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.chain.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len(), Some(self.chain.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(keys: &[&str]) -> Chain<usize> {
        let mut chain = Chain::new();
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(chain.insert((*key).to_string(), i), None);
        }
        chain
    }

    #[test]
    fn test_insert_appends_in_order() {
        let chain = chain_of(&["a", "b", "c"]);
        let keys: Vec<&str> = chain.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(chain.len(), 3);
        assert!(!chain.is_empty());
    }

    #[test]
    fn test_insert_existing_key_replaces_in_place() {
        let mut chain = chain_of(&["a", "b", "c"]);
        assert_eq!(chain.insert("b".to_string(), 10), Some(1));
        assert_eq!(chain.insert("c".to_string(), 20), Some(2));
        assert_eq!(chain.len(), 3);

        let pairs: Vec<(&str, &usize)> = chain.iter().collect();
        assert_eq!(pairs, vec![("a", &0), ("b", &10), ("c", &20)]);
    }

    #[test]
    fn test_find_and_find_mut() {
        let mut chain = chain_of(&["a", "b"]);
        assert_eq!(chain.find("b"), Some(&1));
        assert_eq!(chain.find("z"), None);

        if let Some(value) = chain.find_mut("a") {
            *value = 42;
        }
        assert_eq!(chain.find("a"), Some(&42));
        assert!(chain.find_mut("z").is_none());
    }

    #[test]
    fn test_remove_head_middle_tail() {
        let mut chain = chain_of(&["a", "b", "c", "d"]);

        assert_eq!(chain.remove("b"), Some(1));
        assert_eq!(chain.remove("a"), Some(0));
        assert_eq!(chain.remove("d"), Some(3));
        assert_eq!(chain.remove("d"), None);
        assert_eq!(chain.len(), 1);

        let keys: Vec<&str> = chain.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["c"]);
    }

    #[test]
    fn test_remove_from_empty() {
        let mut chain: Chain<u8> = Chain::new();
        assert_eq!(chain.remove("a"), None);
        assert!(chain.is_empty());
    }

    #[test]
    fn test_into_iter_drains_in_order() {
        let chain = chain_of(&["x", "y"]);
        let drained: Vec<(String, usize)> = chain.into_iter().collect();
        assert_eq!(drained, vec![("x".to_string(), 0), ("y".to_string(), 1)]);
    }

    #[test]
    fn test_long_chain_drops() {
        let mut chain = Chain::new();
        for i in 0..100_000 {
            chain.push_front_for_test(i.to_string(), i);
        }
        assert_eq!(chain.len(), 100_000);
        drop(chain);
    }

    impl<V> Chain<V> {
        // insert walks to the tail, so the drop test builds its chain from the front
        fn push_front_for_test(&mut self, key: String, value: V) {
            let next = self.head.take();
            self.head = Some(Box::new(Node { key, value, next }));
            self.len += 1;
        }
    }
}
