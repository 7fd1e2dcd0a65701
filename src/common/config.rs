use log::info;
use serde::{Deserialize, Serialize};

use crate::common::exception::MapError;

pub const DEFAULT_BUCKET_COUNT: usize = 16; // buckets allocated by `new()`
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75; // pairs per bucket before a rehash
pub const DEFAULT_GROWTH_FACTOR: usize = 2; // bucket count multiplier on rehash
// 2^40 on 64-bit targets, a quarter of the address space on narrower ones
const MAX_BUCKET_SHIFT: u32 = if usize::BITS > 42 { 40 } else { usize::BITS - 2 };
pub const MAX_BUCKET_COUNT: usize = 1 << MAX_BUCKET_SHIFT;
pub const DEFAULT_HASH_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Tuning knobs for a `ChainedHashMap`.
///
/// Every field has a default, so a TOML document only needs to name the
/// fields it wants to change:
///
/// ```toml
/// initial_buckets = 64
/// max_load_factor = 0.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub initial_buckets: usize,
    pub max_load_factor: f64,
    pub growth_factor: usize,
    pub hash_seed: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_BUCKET_COUNT,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

impl MapConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, MapError> {
        let config: MapConfig = toml::from_str(contents)?;
        config.validate()?;
        info!(
            "Loaded map configuration: {} buckets, max load factor {}, growth x{}",
            config.initial_buckets, config.max_load_factor, config.growth_factor
        );
        Ok(config)
    }

    /// Serializes this configuration back to TOML text.
    pub fn to_toml_string(&self) -> Result<String, MapError> {
        toml::to_string(self).map_err(|e| MapError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if self.initial_buckets == 0 {
            return Err(MapError::InvalidConfig(
                "initial_buckets must be greater than zero".to_string(),
            ));
        }
        if self.initial_buckets > MAX_BUCKET_COUNT {
            return Err(MapError::InvalidConfig(format!(
                "initial_buckets must not exceed {}",
                MAX_BUCKET_COUNT
            )));
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(MapError::InvalidConfig(
                "max_load_factor must be a positive finite number".to_string(),
            ));
        }
        if self.growth_factor < 2 {
            return Err(MapError::InvalidConfig(
                "growth_factor must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// Smallest bucket count that holds `pairs` without exceeding the load factor.
    pub fn buckets_for(&self, pairs: usize) -> usize {
        let needed = (pairs as f64 / self.max_load_factor).ceil() as usize;
        needed.max(self.initial_buckets).min(MAX_BUCKET_COUNT)
    }
}
