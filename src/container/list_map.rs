use std::fmt;

use crate::common::exception::MapError;
use crate::container::map_traits::{maps_equal, populate, MapKernel, MapSecondary};
use crate::container::pair::Pair;

/// An association-list map.
///
/// Every operation is a linear scan over a `Vec` of pairs and keys only need
/// `Eq`. It is small enough to be obviously correct, which is what makes it
/// useful as the trusted side when checking `ChainedHashMap`.
pub struct ListMap<K, V> {
    pairs: Vec<Pair<K, V>>,
}

impl<K, V> ListMap<K, V> {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.pairs.iter().map(Pair::as_refs)
    }
}

impl<K: Eq, V> ListMap<K, V> {
    fn position(&self, key: &K) -> Option<usize> {
        self.pairs.iter().position(|pair| pair.key() == key)
    }

    /// Builds a map from `(key, value)` pairs, failing on a duplicate key.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        populate(Self::new(), pairs)
    }
}

impl<K: Eq, V> MapKernel<K, V> for ListMap<K, V> {
    fn try_add(&mut self, key: K, value: V) -> Result<(), (MapError, Pair<K, V>)> {
        if self.position(&key).is_some() {
            return Err((MapError::KeyAlreadyExists, Pair::new(key, value)));
        }
        if self.pairs.try_reserve(1).is_err() {
            let err = MapError::AllocationFailed {
                requested: self.pairs.len() + 1,
            };
            return Err((err, Pair::new(key, value)));
        }
        self.pairs.push(Pair::new(key, value));
        Ok(())
    }

    fn remove(&mut self, key: &K) -> Result<Pair<K, V>, MapError> {
        let index = self.position(key).ok_or(MapError::KeyNotFound)?;
        Ok(self.pairs.swap_remove(index))
    }

    fn remove_any(&mut self) -> Result<Pair<K, V>, MapError> {
        self.pairs.pop().ok_or(MapError::EmptyMap)
    }

    fn value(&self, key: &K) -> Result<&V, MapError> {
        let index = self.position(key).ok_or(MapError::KeyNotFound)?;
        Ok(self.pairs[index].value())
    }

    fn value_mut(&mut self, key: &K) -> Result<&mut V, MapError> {
        let index = self.position(key).ok_or(MapError::KeyNotFound)?;
        Ok(self.pairs[index].value_mut())
    }

    fn has_key(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    fn size(&self) -> usize {
        self.pairs.len()
    }

    fn clear(&mut self) {
        self.pairs.clear();
    }

    fn pairs(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
}

impl<K: Eq, V> MapSecondary<K, V> for ListMap<K, V> {
    fn reserve(&mut self, additional: usize) -> Result<(), MapError> {
        self.pairs
            .try_reserve(additional)
            .map_err(|_| MapError::AllocationFailed {
                requested: self.pairs.len().saturating_add(additional),
            })
    }
}

impl<K, V> Default for ListMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for ListMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            pairs: self.pairs.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ListMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, M> PartialEq<M> for ListMap<K, V>
where
    K: Eq,
    V: PartialEq,
    M: MapKernel<K, V>,
{
    fn eq(&self, other: &M) -> bool {
        maps_equal(self, other)
    }
}

impl<K: Eq, V: Eq> Eq for ListMap<K, V> {}
