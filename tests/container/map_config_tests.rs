use bucketmap::common::config::{MapConfig, DEFAULT_MAX_LOAD_FACTOR};
use bucketmap::{ChainedHashMap, MapError, MapKernel};

use crate::assert_ok;
use crate::common::logger::init_test_logger;

#[test]
fn test_map_built_from_toml_config() {
    init_test_logger();

    let config = assert_ok!(MapConfig::from_toml_str(
        r#"
        initial_buckets = 4
        max_load_factor = 1.0
        "#
    ));
    assert_eq!(config.growth_factor, 2);

    let mut map = assert_ok!(ChainedHashMap::with_config(config));
    assert_eq!(map.bucket_count(), 4);

    // Load factor 1.0 lets four pairs fit before the fifth forces growth
    for key in 0..4u32 {
        assert_ok!(map.add(key, key * 10));
    }
    assert_eq!(map.bucket_count(), 4);
    assert_ok!(map.add(4, 40));
    assert_eq!(map.bucket_count(), 8);
    assert_eq!(map.size(), 5);
}

#[test]
fn test_invalid_config_rejected_before_building() {
    init_test_logger();

    let result = MapConfig::from_toml_str("initial_buckets = 0");
    assert!(matches!(result, Err(MapError::InvalidConfig(_))));

    let result = MapConfig::from_toml_str("max_load_factor = -1.0");
    assert!(matches!(result, Err(MapError::InvalidConfig(_))));

    let result = MapConfig::from_toml_str("bucket_count = 8");
    assert!(matches!(result, Err(MapError::ConfigParse(_))));
}

#[test]
fn test_config_survives_toml_round_trip() {
    let config = MapConfig {
        initial_buckets: 128,
        max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        growth_factor: 4,
        hash_seed: 7,
    };
    let text = assert_ok!(config.to_toml_string());
    assert_eq!(assert_ok!(MapConfig::from_toml_str(&text)), config);
}
