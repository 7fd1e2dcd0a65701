//! # Map Trait Hierarchy
//!
//! Every map in this crate speaks the same contract, split into a small kernel
//! and a secondary layer written purely on top of it.
//!
//! ```text
//!   ┌─────────────────────────────────────────────────┐
//!   │                MapKernel<K, V>                  │
//!   │                                                 │
//!   │  try_add(&mut, K, V)   → Result<(), (E, Pair)>  │
//!   │  add(&mut, K, V)       → Result<()>             │
//!   │  remove(&mut, &K)      → Result<Pair<K, V>>     │
//!   │  remove_any(&mut)      → Result<Pair<K, V>>     │
//!   │  value(&, &K)          → Result<&V>             │
//!   │  value_mut(&mut, &K)   → Result<&mut V>         │
//!   │  has_key(&, &K)        → bool                   │
//!   │  has_value(&, &V)      → bool                   │
//!   │  size(&)               → usize                  │
//!   │  clear(&mut)                                    │
//!   │  pairs(&)              → iterator of (&K, &V)   │
//!   └────────────────────────┬────────────────────────┘
//!                            │
//!                            ▼
//!   ┌─────────────────────────────────────────────────┐
//!   │              MapSecondary<K, V>                 │
//!   │                                                 │
//!   │  replace_value(&K, V)  → Result<V>              │
//!   │  key_of(&V)            → Result<&K>             │
//!   │  shares_key_with(&M)   → bool                   │
//!   │  combine_with(&mut Self)                        │
//!   │  transfer_from(&mut Self)                       │
//!   └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Preconditions
//!
//! | Operation     | Requires          | Error on violation  |
//! |---------------|-------------------|---------------------|
//! | `add`         | key absent        | `KeyAlreadyExists`  |
//! | `remove`      | key present       | `KeyNotFound`       |
//! | `value`       | key present       | `KeyNotFound`       |
//! | `remove_any`  | map not empty     | `EmptyMap`          |
//! | `key_of`      | value present     | `ValueNotFound`     |
//! | `combine_with`| keys disjoint     | `KeyAlreadyExists`  |
//!
//! A precondition error is reported before anything is mutated.
//!
//! ## Equality
//!
//! Two maps are equal when they hold the same set of pairs. Bucket layout and
//! insertion order never matter. [`maps_equal`] implements this using only
//! `size`, `pairs` and `value`, so any two implementations can be compared.

use crate::common::exception::MapError;
use crate::container::pair::Pair;

/// Kernel operations every map supports.
pub trait MapKernel<K, V> {
    /// Adds the pair `(key, value)`, handing the pair back with the error
    /// when it could not be stored.
    fn try_add(&mut self, key: K, value: V) -> Result<(), (MapError, Pair<K, V>)>;

    /// Adds the pair `(key, value)`. Fails if `key` is already present.
    fn add(&mut self, key: K, value: V) -> Result<(), MapError> {
        self.try_add(key, value).map_err(|(err, _)| err)
    }

    /// Removes the pair whose key is `key` and returns it.
    fn remove(&mut self, key: &K) -> Result<Pair<K, V>, MapError>;

    /// Removes and returns an unspecified pair.
    fn remove_any(&mut self) -> Result<Pair<K, V>, MapError>;

    /// Returns the value associated with `key`.
    fn value(&self, key: &K) -> Result<&V, MapError>;

    fn value_mut(&mut self, key: &K) -> Result<&mut V, MapError>;

    fn has_key(&self, key: &K) -> bool;

    /// Reports whether any pair holds `value`.
    fn has_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.pairs().any(|(_, v)| v == value)
    }

    /// Number of pairs currently stored
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Removes all pairs
    fn clear(&mut self);

    /// Iterates over every pair in an unspecified order.
    fn pairs(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_>;
}

/// Operations layered on top of the kernel.
pub trait MapSecondary<K, V>: MapKernel<K, V> {
    /// Replaces the value stored for `key`, returning the old one.
    fn replace_value(&mut self, key: &K, value: V) -> Result<V, MapError> {
        let slot = self.value_mut(key)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Returns some key whose value equals `value`.
    ///
    /// When several keys share the value, which one is returned is unspecified.
    fn key_of<'a>(&'a self, value: &V) -> Result<&'a K, MapError>
    where
        V: PartialEq + 'a,
    {
        self.pairs()
            .find(|(_, v)| *v == value)
            .map(|(k, _)| k)
            .ok_or(MapError::ValueNotFound)
    }

    /// Reports whether `self` and `other` have at least one key in common.
    fn shares_key_with<M>(&self, other: &M) -> bool
    where
        M: MapKernel<K, V> + ?Sized,
    {
        if self.size() <= other.size() {
            self.pairs().any(|(k, _)| other.has_key(k))
        } else {
            other.pairs().any(|(k, _)| self.has_key(k))
        }
    }

    /// Moves every pair of `other` into `self`, leaving `other` empty.
    ///
    /// Fails with `KeyAlreadyExists`, leaving both maps untouched, when the two
    /// maps share a key. Storage for the incoming pairs is reserved up front.
    /// If an allocation still fails part way, the pairs moved so far remain in
    /// `self` and the pair being moved goes back to `other`.
    fn combine_with(&mut self, other: &mut Self) -> Result<(), MapError>
    where
        Self: Sized,
    {
        if self.shares_key_with(&*other) {
            return Err(MapError::KeyAlreadyExists);
        }
        self.reserve(other.size())?;
        while !other.is_empty() {
            let (key, value) = other.remove_any()?.into_parts();
            if let Err((err, pair)) = self.try_add(key, value) {
                // The slot the pair came from is still allocated in `other`
                let (key, value) = pair.into_parts();
                other.add(key, value)?;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Makes `self` hold exactly what `other` held and empties `other`.
    fn transfer_from(&mut self, other: &mut Self)
    where
        Self: Sized,
    {
        std::mem::swap(self, other);
        other.clear();
    }

    /// Makes room for `additional` more pairs without further growth.
    fn reserve(&mut self, additional: usize) -> Result<(), MapError>;
}

/// Marker trait for maps that are safe to share between threads.
pub trait ConcurrentMap: Send + Sync {}

/// Lookup and growth statistics.
pub trait MapStats {
    /// Number of keyed lookups served (`has_key`, `value`, `value_mut`).
    fn total_lookups(&self) -> u64;

    fn total_hits(&self) -> u64;

    fn total_misses(&self) -> u64 {
        self.total_lookups().saturating_sub(self.total_hits())
    }

    /// Fraction of lookups that found their key (0.0 to 1.0).
    fn hit_ratio(&self) -> f64 {
        match self.total_lookups() {
            0 => 0.0,
            lookups => self.total_hits() as f64 / lookups as f64,
        }
    }

    fn total_rehashes(&self) -> u64;

    fn reset_stats(&mut self);
}

/// Content equality between any two maps.
///
/// Both maps must hold the same number of pairs and every pair of `a` must be
/// present, with an equal value, in `b`. Since keys are unique this is exactly
/// set equality of the pairs.
pub fn maps_equal<K, V, A, B>(a: &A, b: &B) -> bool
where
    A: MapKernel<K, V> + ?Sized,
    B: MapKernel<K, V> + ?Sized,
    V: PartialEq,
{
    a.size() == b.size()
        && a
            .pairs()
            .all(|(key, value)| matches!(b.value(key), Ok(other) if other == value))
}

/// Adds every pair from `pairs` to `map`, failing on the first duplicate key.
pub fn populate<K, V, M, I>(mut map: M, pairs: I) -> Result<M, MapError>
where
    M: MapKernel<K, V>,
    I: IntoIterator<Item = (K, V)>,
{
    for (key, value) in pairs {
        map.add(key, value)?;
    }
    Ok(map)
}
