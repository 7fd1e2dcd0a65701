//! # Chained Hash Map
//!
//! A generic associative container that keeps unique keys in a bucket array
//! of collision chains and grows by rehashing when the load factor passes its
//! configured maximum.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                       ChainedHashMap<K, V>                           │
//!   │                                                                      │
//!   │   buckets: Vec<Bucket<K, V>>          index = hash(key) % len        │
//!   │                                                                      │
//!   │   [0] ──► (h1, k1, v1) ─ (h9, k9, v9)                                │
//!   │   [1] ──► ∅                                                          │
//!   │   [2] ──► (h4, k4, v4)                                               │
//!   │   [3] ──► (h2, k2, v2) ─ (h6, k6, v6) ─ (h7, k7, v7)                 │
//!   │   ...                                                                │
//!   │                                                                      │
//!   │   len: usize            pair count                                   │
//!   │   config: MapConfig     load factor, growth factor, seed             │
//!   │   hash_fn: HashFunction seeded xxh3                                  │
//!   │   any_cursor: usize     where remove_any resumes scanning            │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each entry caches the full 64-bit hash of its key. Chain scans compare the
//! cached hash before the key, and a rehash only recomputes `hash % len`.
//!
//! ## Add and Rehash Flow
//!
//! ```text
//!   add(key, value)
//!        │
//!        ▼
//!   key already present? ── YES ──► Err(KeyAlreadyExists), map unchanged
//!        │ NO
//!        ▼
//!   (len + 1) / buckets > max_load_factor?
//!        │ YES                                   │ NO
//!        ▼                                       │
//!   ┌─────────────────────────────────────┐      │
//!   │ 1. count entries per new bucket     │      │
//!   │ 2. allocate new array + every chain │      │
//!   │    (any failure: Err, map unchanged)│      │
//!   │ 3. move entries, no allocation      │      │
//!   └─────────────────────────────────────┘      │
//!        │                                       │
//!        ▼                                       ▼
//!   reserve one slot in the target chain, push the entry, len += 1
//! ```
//!
//! ## Core Operations
//!
//! | Method         | Complexity    | Notes                                    |
//! |----------------|---------------|------------------------------------------|
//! | `add`          | O(1) amortized| may rehash, O(n) when it does            |
//! | `remove`       | O(1) expected | swap-remove inside the chain             |
//! | `remove_any`   | O(1) amortized| rotating cursor over the bucket array    |
//! | `value`        | O(1) expected |                                          |
//! | `has_key`      | O(1) expected |                                          |
//! | `has_value`    | O(n)          | values are not indexed                   |
//! | `size`         | O(1)          |                                          |
//! | `clear`        | O(n)          | keeps the current bucket count           |
//!
//! ## Arbitrary Removal
//!
//! `remove_any` makes no promise about which pair it returns. The current
//! policy pops the tail of the first non-empty chain at or after a cursor and
//! leaves the cursor there, so draining a map touches each bucket once.
//!
//! ## Thread Safety
//!
//! - `ChainedHashMap` is **NOT** internally synchronized
//! - Wrap it in `SharedMap` (an `RwLock`) for shared access
//! - Metrics counters are relaxed atomics so concurrent readers never race

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace, warn};

use crate::common::config::{MapConfig, MAX_BUCKET_COUNT};
use crate::common::exception::MapError;
use crate::container::bucket::{Bucket, Entry};
use crate::container::hash_function::{reduce, HashFunction};
use crate::container::map_traits::{maps_equal, MapKernel, MapSecondary, MapStats};
use crate::container::pair::Pair;

/// Hash map with separate chaining.
///
/// See module-level documentation for details.
pub struct ChainedHashMap<K, V> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    config: MapConfig,
    hash_fn: HashFunction<K>,
    any_cursor: usize,
    metrics: MapMetrics,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MapMetricsSnapshot {
    pub lookups: u64,
    pub lookup_hits: u64,
    pub probe_steps: u64, // chain entries inspected by any keyed search

    pub adds: u64,
    pub add_rejected: u64,
    pub removes: u64,

    pub remove_any_calls: u64,
    pub remove_any_scan_steps: u64,

    pub rehashes: u64,
    pub rehash_moved_entries: u64,
    pub allocation_failures: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub bucket_count: usize,
    pub longest_chain: usize,
    pub load_factor: f64,
}

/// A relaxed atomic counter.
#[derive(Debug, Default)]
struct Counter(AtomicU64);

impl Counter {
    #[inline]
    fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    fn incr(&self) {
        self.add(1);
    }

    #[inline]
    fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
struct MapMetrics {
    lookups: Counter,
    lookup_hits: Counter,
    probe_steps: Counter,
    adds: Counter,
    add_rejected: Counter,
    removes: Counter,
    remove_any_calls: Counter,
    remove_any_scan_steps: Counter,
    rehashes: Counter,
    rehash_moved_entries: Counter,
    allocation_failures: Counter,
}

/// Allocates `count` empty buckets, reporting failure instead of aborting.
fn allocate_buckets<K, V>(count: usize) -> Option<Vec<Bucket<K, V>>> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(count).ok()?;
    buckets.resize_with(count, Bucket::new);
    Some(buckets)
}

impl<K, V> ChainedHashMap<K, V> {
    fn from_parts(config: MapConfig, buckets: Vec<Bucket<K, V>>) -> Self {
        Self {
            hash_fn: HashFunction::with_seed(config.hash_seed),
            buckets,
            len: 0,
            config,
            any_cursor: 0,
            metrics: MapMetrics::default(),
        }
    }

    /// Number of slots in the bucket array.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Current ratio of pairs to buckets.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Length of the longest collision chain.
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Bucket::len).max().unwrap_or(0)
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn hash_function(&self) -> &HashFunction<K> {
        &self.hash_fn
    }

    /// Iterates over `(&key, &value)` in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(Bucket::iter)
            .map(|entry| entry.pair.as_refs())
    }

    /// Consumes the map, yielding every stored pair.
    pub fn into_pairs(self) -> IntoPairs<K, V> {
        IntoPairs {
            remaining: self.len,
            inner: self.buckets.into_iter().flatten(),
        }
    }

    /// Returns snapshot metrics from the map.
    pub fn metrics_snapshot(&self) -> MapMetricsSnapshot {
        MapMetricsSnapshot {
            lookups: self.metrics.lookups.get(),
            lookup_hits: self.metrics.lookup_hits.get(),
            probe_steps: self.metrics.probe_steps.get(),
            adds: self.metrics.adds.get(),
            add_rejected: self.metrics.add_rejected.get(),
            removes: self.metrics.removes.get(),
            remove_any_calls: self.metrics.remove_any_calls.get(),
            remove_any_scan_steps: self.metrics.remove_any_scan_steps.get(),
            rehashes: self.metrics.rehashes.get(),
            rehash_moved_entries: self.metrics.rehash_moved_entries.get(),
            allocation_failures: self.metrics.allocation_failures.get(),
            len: self.len,
            bucket_count: self.buckets.len(),
            longest_chain: self.longest_chain(),
            load_factor: self.load_factor(),
        }
    }

    fn allocation_failed(&self, requested: usize) -> MapError {
        self.metrics.allocation_failures.incr();
        warn!(
            "Allocation of {} slots failed; map left with {} pairs in {} buckets",
            requested,
            self.len,
            self.buckets.len()
        );
        MapError::AllocationFailed { requested }
    }

    fn exceeds_load_factor(&self, pairs: usize) -> bool {
        pairs as f64 > self.config.max_load_factor * self.buckets.len() as f64
    }
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    /// Creates an empty map with the default configuration.
    pub fn new() -> Self {
        let config = MapConfig::default();
        let buckets = (0..config.initial_buckets).map(|_| Bucket::new()).collect();
        Self::from_parts(config, buckets)
    }

    /// Creates an empty map sized to hold `capacity` pairs without rehashing.
    ///
    /// Like `Vec::with_capacity`, aborts if the bucket array cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        let config = Self::config_for_capacity(capacity);
        let buckets = (0..config.initial_buckets).map(|_| Bucket::new()).collect();
        Self::from_parts(config, buckets)
    }

    fn config_for_capacity(capacity: usize) -> MapConfig {
        let defaults = MapConfig::default();
        MapConfig {
            initial_buckets: defaults.buckets_for(capacity),
            ..defaults
        }
    }

    /// Creates an empty map from a validated configuration.
    pub fn with_config(config: MapConfig) -> Result<Self, MapError> {
        config.validate()?;
        let requested = config.initial_buckets;
        let buckets = allocate_buckets(requested).ok_or_else(|| {
            warn!("Allocation of {} initial buckets failed", requested);
            MapError::AllocationFailed { requested }
        })?;
        Ok(Self::from_parts(config, buckets))
    }

    /// Builds a map from `(key, value)` pairs, failing on a duplicate key.
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let mut map = Self::with_config(Self::config_for_capacity(pairs.size_hint().0))?;
        for (key, value) in pairs {
            map.add(key, value)?;
        }
        Ok(map)
    }

    /// Grows the bucket array so that `additional` more pairs fit under the
    /// load factor. On failure the map is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), MapError> {
        let wanted = self
            .len
            .checked_add(additional)
            .ok_or_else(|| self.allocation_failed(usize::MAX))?;
        if !self.exceeds_load_factor(wanted) {
            return Ok(());
        }
        let target = self.config.buckets_for(wanted);
        if target > self.buckets.len() {
            self.rehash_to(target)?;
        }
        Ok(())
    }

    /// Finds the bucket and chain position of `key`.
    fn locate(&self, hash: u64, key: &K) -> Option<(usize, usize)> {
        let index = reduce(hash, self.buckets.len());
        let (position, steps) = self.buckets[index].position(hash, key);
        self.metrics.probe_steps.add(steps as u64);
        position.map(|position| (index, position))
    }

    /// `locate` for the query operations, which are counted as lookups.
    fn lookup(&self, key: &K) -> Option<(usize, usize)> {
        let found = self.locate(self.hash_fn.get_hash(key), key);
        self.metrics.lookups.incr();
        if found.is_some() {
            self.metrics.lookup_hits.incr();
        }
        found
    }

    /// Multiplies the bucket count by the growth factor until `pairs` fit.
    fn grow(&mut self, pairs: usize) -> Result<(), MapError> {
        let current = self.buckets.len();
        let mut target = current;
        while target < MAX_BUCKET_COUNT
            && pairs as f64 > self.config.max_load_factor * target as f64
        {
            target = target
                .saturating_mul(self.config.growth_factor)
                .min(MAX_BUCKET_COUNT);
        }
        if target <= current {
            // At the ceiling, chains absorb the extra load
            return Ok(());
        }
        self.rehash_to(target)
    }

    /// Redistributes every entry into `new_count` buckets.
    ///
    /// All allocation happens before the first entry moves, so an error leaves
    /// the old table in place.
    fn rehash_to(&mut self, new_count: usize) -> Result<(), MapError> {
        let old_count = self.buckets.len();

        let mut chain_lengths: Vec<usize> = Vec::new();
        chain_lengths
            .try_reserve_exact(new_count)
            .map_err(|_| self.allocation_failed(new_count))?;
        chain_lengths.resize(new_count, 0);
        for entry in self.buckets.iter().flat_map(Bucket::iter) {
            chain_lengths[reduce(entry.hash, new_count)] += 1;
        }

        let mut new_buckets =
            allocate_buckets(new_count).ok_or_else(|| self.allocation_failed(new_count))?;
        for (bucket, &length) in new_buckets.iter_mut().zip(&chain_lengths) {
            if length > 0 {
                bucket
                    .try_reserve_exact(length)
                    .map_err(|_| self.allocation_failed(length))?;
            }
        }

        let old_buckets = std::mem::replace(&mut self.buckets, new_buckets);
        for bucket in old_buckets {
            for entry in bucket {
                let index = reduce(entry.hash, new_count);
                self.buckets[index].push(entry);
            }
        }

        self.any_cursor = 0;
        self.metrics.rehashes.incr();
        self.metrics.rehash_moved_entries.add(self.len as u64);
        debug!(
            "Rehashed {} pairs from {} to {} buckets",
            self.len, old_count, new_count
        );
        Ok(())
    }
}

impl<K, V> MapKernel<K, V> for ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    fn try_add(&mut self, key: K, value: V) -> Result<(), (MapError, Pair<K, V>)> {
        let hash = self.hash_fn.get_hash(&key);
        if self.locate(hash, &key).is_some() {
            self.metrics.add_rejected.incr();
            return Err((MapError::KeyAlreadyExists, Pair::new(key, value)));
        }

        if self.exceeds_load_factor(self.len + 1) {
            if let Err(err) = self.grow(self.len + 1) {
                return Err((err, Pair::new(key, value)));
            }
        }

        let index = reduce(hash, self.buckets.len());
        if self.buckets[index].try_reserve(1).is_err() {
            let err = self.allocation_failed(self.buckets[index].len() + 1);
            return Err((err, Pair::new(key, value)));
        }
        self.buckets[index].push(Entry::new(hash, Pair::new(key, value)));
        self.len += 1;
        self.metrics.adds.incr();
        Ok(())
    }

    fn remove(&mut self, key: &K) -> Result<Pair<K, V>, MapError> {
        let hash = self.hash_fn.get_hash(key);
        let (index, position) = self.locate(hash, key).ok_or(MapError::KeyNotFound)?;
        let entry = self.buckets[index].take(position);
        self.len -= 1;
        self.metrics.removes.incr();
        Ok(entry.pair)
    }

    fn remove_any(&mut self) -> Result<Pair<K, V>, MapError> {
        self.metrics.remove_any_calls.incr();
        if self.len == 0 {
            return Err(MapError::EmptyMap);
        }

        let bucket_count = self.buckets.len();
        for step in 0..bucket_count {
            let index = (self.any_cursor + step) % bucket_count;
            if let Some(entry) = self.buckets[index].pop() {
                if index != self.any_cursor {
                    trace!("remove_any cursor moved {} -> {}", self.any_cursor, index);
                }
                self.any_cursor = index;
                self.len -= 1;
                self.metrics.remove_any_scan_steps.add(step as u64 + 1);
                return Ok(entry.pair);
            }
        }

        // len > 0 guarantees a non-empty chain
        Err(MapError::EmptyMap)
    }

    fn value(&self, key: &K) -> Result<&V, MapError> {
        let (index, position) = self.lookup(key).ok_or(MapError::KeyNotFound)?;
        Ok(self.buckets[index].get(position).pair.value())
    }

    fn value_mut(&mut self, key: &K) -> Result<&mut V, MapError> {
        let (index, position) = self.lookup(key).ok_or(MapError::KeyNotFound)?;
        Ok(self.buckets[index].get_mut(position).pair.value_mut())
    }

    fn has_key(&self, key: &K) -> bool {
        self.lookup(key).is_some()
    }

    fn size(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Bucket::clear);
        self.len = 0;
        self.any_cursor = 0;
    }

    fn pairs(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
}

impl<K, V> MapSecondary<K, V> for ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    fn reserve(&mut self, additional: usize) -> Result<(), MapError> {
        self.try_reserve(additional)
    }
}

impl<K, V> MapStats for ChainedHashMap<K, V> {
    fn total_lookups(&self) -> u64 {
        self.metrics.lookups.get()
    }

    fn total_hits(&self) -> u64 {
        self.metrics.lookup_hits.get()
    }

    fn total_rehashes(&self) -> u64 {
        self.metrics.rehashes.get()
    }

    fn reset_stats(&mut self) {
        self.metrics = MapMetrics::default();
    }
}

/// Owning iterator returned by [`ChainedHashMap::into_pairs`].
pub struct IntoPairs<K, V> {
    inner: std::iter::Flatten<std::vec::IntoIter<Bucket<K, V>>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoPairs<K, V> {
    type Item = Pair<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        self.remaining -= 1;
        Some(entry.pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoPairs<K, V> {}

impl<K, V> IntoIterator for ChainedHashMap<K, V> {
    type Item = Pair<K, V>;
    type IntoIter = IntoPairs<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_pairs()
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for ChainedHashMap<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            len: self.len,
            config: self.config.clone(),
            hash_fn: self.hash_fn.clone(),
            any_cursor: self.any_cursor,
            metrics: MapMetrics::default(),
        }
    }
}

impl<K, V> fmt::Debug for ChainedHashMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, M> PartialEq<M> for ChainedHashMap<K, V>
where
    K: Hash + Eq,
    V: PartialEq,
    M: MapKernel<K, V>,
{
    fn eq(&self, other: &M) -> bool {
        maps_equal(self, other)
    }
}

impl<K, V> Eq for ChainedHashMap<K, V>
where
    K: Hash + Eq,
    V: Eq,
{
}
