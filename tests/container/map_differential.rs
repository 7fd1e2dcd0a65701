//! Randomized differential runs against `std::collections::HashMap`.
//!
//! Every step draws an operation, applies it to the map under test and to the
//! standard map, and checks that both agree on the outcome, including which
//! precondition errors are raised.

use std::collections::HashMap;
use std::fmt::Debug;

use bucketmap::common::config::MapConfig;
use bucketmap::{ChainedHashMap, ListMap, MapError, MapKernel};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assert_ok;
use crate::common::logger::init_test_logger;

const KEY_SPACE: u16 = 256;

fn assert_same_content<M>(map: &M, oracle: &HashMap<u16, u32>)
where
    M: MapKernel<u16, u32> + Debug,
{
    assert_eq!(map.size(), oracle.len(), "size mismatch for {:?}", map);
    for (key, value) in oracle {
        assert_eq!(map.value(key), Ok(value), "value mismatch for key {}", key);
    }
    for (key, value) in map.pairs() {
        assert_eq!(oracle.get(key), Some(value), "unexpected pair ({}, {})", key, value);
    }
}

fn run_random_script<M>(mut map: M, seed: u64, steps: usize)
where
    M: MapKernel<u16, u32> + Debug,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut oracle: HashMap<u16, u32> = HashMap::new();

    for step in 0..steps {
        let key = rng.gen_range(0..KEY_SPACE);
        match rng.gen_range(0..100) {
            0..=39 => {
                let value = rng.gen::<u32>();
                let result = map.add(key, value);
                if oracle.contains_key(&key) {
                    assert_eq!(result, Err(MapError::KeyAlreadyExists));
                } else {
                    assert_eq!(result, Ok(()));
                    oracle.insert(key, value);
                }
            },
            40..=59 => {
                let result = map.remove(&key);
                match oracle.remove(&key) {
                    Some(value) => {
                        let pair = assert_ok!(result);
                        assert_eq!(pair.into_parts(), (key, value));
                    },
                    None => assert_eq!(result, Err(MapError::KeyNotFound)),
                }
            },
            60..=69 => {
                let result = map.remove_any();
                if oracle.is_empty() {
                    assert_eq!(result, Err(MapError::EmptyMap));
                } else {
                    let (removed_key, removed_value) = assert_ok!(result).into_parts();
                    assert_eq!(oracle.remove(&removed_key), Some(removed_value));
                }
            },
            70..=84 => {
                assert_eq!(map.has_key(&key), oracle.contains_key(&key));
                match oracle.get(&key) {
                    Some(value) => assert_eq!(map.value(&key), Ok(value)),
                    None => assert_eq!(map.value(&key), Err(MapError::KeyNotFound)),
                }
            },
            85..=94 => {
                let value = rng.gen_range(0..64u32);
                assert_eq!(map.has_value(&value), oracle.values().any(|v| *v == value));
            },
            _ => {
                assert_eq!(map.size(), oracle.len());
            },
        }

        if step % 500 == 0 {
            assert_same_content(&map, &oracle);
        }
    }

    assert_same_content(&map, &oracle);

    // Drain what is left and make sure nothing is lost or duplicated
    while let Ok(pair) = map.remove_any() {
        let (key, value) = pair.into_parts();
        assert_eq!(oracle.remove(&key), Some(value));
    }
    assert!(oracle.is_empty());
    assert_eq!(map.size(), 0);
}

#[test]
fn test_chained_map_matches_std_hash_map() {
    init_test_logger();
    for seed in [1, 7, 42, 1_000_003] {
        run_random_script(ChainedHashMap::new(), seed, 5_000);
    }
}

#[test]
fn test_chained_map_with_tight_config_matches_std_hash_map() {
    init_test_logger();
    let config = MapConfig {
        initial_buckets: 1,
        max_load_factor: 0.5,
        growth_factor: 2,
        hash_seed: 3,
    };
    for seed in [2, 99] {
        run_random_script(assert_ok!(ChainedHashMap::with_config(config.clone())), seed, 5_000);
    }
}

#[test]
fn test_list_map_matches_std_hash_map() {
    init_test_logger();
    run_random_script(ListMap::new(), 5, 3_000);
}

#[test]
fn test_load_factor_bound_holds_throughout() {
    init_test_logger();
    let mut rng = StdRng::seed_from_u64(11);
    let mut map: ChainedHashMap<u32, u32> = ChainedHashMap::new();

    for _ in 0..20_000 {
        let key = rng.gen_range(0..4_096u32);
        if rng.gen_bool(0.7) {
            let _ = map.add(key, key);
        } else {
            let _ = map.remove(&key);
        }
        assert!(
            map.load_factor() <= map.config().max_load_factor,
            "load factor {} over bound with {} pairs in {} buckets",
            map.load_factor(),
            map.size(),
            map.bucket_count()
        );
    }
}
