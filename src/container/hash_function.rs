use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use xxhash_rust::xxh3;

use crate::common::config::DEFAULT_HASH_SEED;

/// Represents a seeded hash function for a given key type.
///
/// Two `HashFunction`s with the same seed always produce the same hash for
/// equal keys, which is what lets a map be cloned or compared across
/// instances without rehashing.
pub struct HashFunction<K: ?Sized> {
    seed: u64,
    _marker: PhantomData<fn(&K)>,
}

impl<K: ?Sized> HashFunction<K> {
    /// Creates a new `HashFunction` using the crate's default seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_HASH_SEED)
    }

    /// Creates a new `HashFunction` with an explicit seed.
    ///
    /// # Parameters
    /// - `seed`: Seed mixed into every hash.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            _marker: PhantomData,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<K> HashFunction<K>
where
    K: Hash + ?Sized,
{
    /// Returns the hash value of the given key.
    ///
    /// # Parameters
    /// - `key`: The key to be hashed.
    ///
    /// # Returns
    /// The hashed value.
    pub fn get_hash(&self, key: &K) -> u64 {
        let mut hasher = xxh3::Xxh3::with_seed(self.seed);
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Reduces the hash of `key` to a bucket index in `0..bucket_count`.
    #[inline]
    pub fn bucket_index(&self, key: &K, bucket_count: usize) -> usize {
        reduce(self.get_hash(key), bucket_count)
    }
}

/// Maps a full hash onto a bucket array of length `bucket_count`.
#[inline]
pub(crate) fn reduce(hash: u64, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0);
    (hash % bucket_count as u64) as usize
}

impl<K: ?Sized> Default for HashFunction<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ?Sized> Clone for HashFunction<K> {
    fn clone(&self) -> Self {
        Self::with_seed(self.seed)
    }
}

impl<K: ?Sized> fmt::Debug for HashFunction<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashFunction")
            .field("seed", &self.seed)
            .finish()
    }
}
