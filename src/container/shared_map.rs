use std::fmt;
use std::marker::PhantomData;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::exception::MapError;
use crate::container::chained_hash_map::ChainedHashMap;
use crate::container::map_traits::{ConcurrentMap, MapKernel};
use crate::container::pair::Pair;

/// A map behind a reader-writer lock.
///
/// Queries (`has_key`, `has_value`, `size`, `value`) share the read lock and
/// may run concurrently. Mutations take the write lock. Values come back by
/// clone because a reference cannot outlive the guard; hold [`SharedMap::read`]
/// directly to borrow instead.
pub struct SharedMap<K, V, M = ChainedHashMap<K, V>> {
    inner: RwLock<M>,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V, M> SharedMap<K, V, M>
where
    M: MapKernel<K, V>,
{
    pub fn new(map: M) -> Self {
        Self {
            inner: RwLock::new(map),
            _marker: PhantomData,
        }
    }

    pub fn into_inner(self) -> M {
        self.inner.into_inner()
    }

    /// Locks for shared access.
    pub fn read(&self) -> RwLockReadGuard<'_, M> {
        self.inner.read()
    }

    /// Locks for exclusive access, for compound operations that must not interleave.
    pub fn write(&self) -> RwLockWriteGuard<'_, M> {
        self.inner.write()
    }

    pub fn add(&self, key: K, value: V) -> Result<(), MapError> {
        self.inner.write().add(key, value)
    }

    /// Adds the pair unless `key` is already present.
    ///
    /// Returns `true` if the pair was added. The presence check and the insert
    /// happen under one write lock.
    pub fn add_if_absent(&self, key: K, value: V) -> Result<bool, MapError> {
        let mut map = self.inner.write();
        if map.has_key(&key) {
            return Ok(false);
        }
        map.add(key, value)?;
        Ok(true)
    }

    pub fn remove(&self, key: &K) -> Result<Pair<K, V>, MapError> {
        self.inner.write().remove(key)
    }

    pub fn remove_any(&self) -> Result<Pair<K, V>, MapError> {
        self.inner.write().remove_any()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn has_key(&self, key: &K) -> bool {
        self.inner.read().has_key(key)
    }

    pub fn has_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.read().has_value(value)
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns a clone of the value stored for `key`.
    pub fn value(&self, key: &K) -> Result<V, MapError>
    where
        V: Clone,
    {
        self.inner.read().value(key).cloned()
    }

    /// Copies out every pair under a single read lock.
    pub fn snapshot(&self) -> Vec<Pair<K, V>>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .pairs()
            .map(|(k, v)| Pair::new(k.clone(), v.clone()))
            .collect()
    }
}

impl<K, V, M> Default for SharedMap<K, V, M>
where
    M: MapKernel<K, V> + Default,
{
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<K, V, M> fmt::Debug for SharedMap<K, V, M>
where
    M: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Some(map) => f.debug_tuple("SharedMap").field(&*map).finish(),
            None => f.write_str("SharedMap(<locked>)"),
        }
    }
}

impl<K, V, M> ConcurrentMap for SharedMap<K, V, M> where M: Send + Sync {}
