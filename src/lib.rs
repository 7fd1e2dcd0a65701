pub mod common;
pub mod container;

pub use common::exception::MapError;
pub use container::chained_hash_map::ChainedHashMap;
pub use container::list_map::ListMap;
pub use container::map_traits::{MapKernel, MapSecondary};
pub use container::pair::Pair;
pub use container::shared_map::SharedMap;
