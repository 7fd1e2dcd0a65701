use std::collections::TryReserveError;

use crate::container::pair::Pair;

/// A stored pair together with the full hash of its key.
///
/// Keeping the hash lets a rehash redistribute entries without touching the
/// keys, and lets chain scans skip most key comparisons.
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) hash: u64,
    pub(crate) pair: Pair<K, V>,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(hash: u64, pair: Pair<K, V>) -> Self {
        Self { hash, pair }
    }
}

/// One slot of the bucket array: the collision chain for every key that
/// reduces to this index. Chain order carries no meaning.
#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    /// Creates an empty chain. Does not allocate.
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Finds the chain position of `key`.
    ///
    /// Returns the position (if found) and how many entries were inspected.
    pub(crate) fn position(&self, hash: u64, key: &K) -> (Option<usize>, usize)
    where
        K: Eq,
    {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.hash == hash && entry.pair.key() == key {
                return (Some(index), index + 1);
            }
        }
        (None, self.entries.len())
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> &Entry<K, V> {
        &self.entries[index]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Entry<K, V> {
        &mut self.entries[index]
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.entries.try_reserve(additional)
    }

    pub(crate) fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.entries.try_reserve_exact(additional)
    }

    /// Appends an entry. Callers reserve first when allocation must not abort.
    #[inline]
    pub(crate) fn push(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    /// Removes the entry at `index`, moving the chain's last entry into its place.
    #[inline]
    pub(crate) fn take(&mut self, index: usize) -> Entry<K, V> {
        self.entries.swap_remove(index)
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<Entry<K, V>> {
        self.entries.pop()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K, V> IntoIterator for Bucket<K, V> {
    type Item = Entry<K, V>;
    type IntoIter = std::vec::IntoIter<Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
