pub mod bucket;
pub mod chained_hash_map;
pub mod hash_function;
pub mod list_map;
pub mod map_traits;
pub mod pair;
pub mod shared_map;
