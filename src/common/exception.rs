use thiserror::Error;

/// Errors surfaced by map operations.
///
/// The precondition variants (`KeyNotFound`, `KeyAlreadyExists`, `EmptyMap`,
/// `ValueNotFound`) are returned before any mutation happens, so a map that
/// reports one of them is exactly as it was before the call.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("Key not found in map")]
    KeyNotFound,
    #[error("Key already present in map")]
    KeyAlreadyExists,
    #[error("Cannot remove a pair from an empty map")]
    EmptyMap,
    #[error("Value not found in map")]
    ValueNotFound,
    #[error("Failed to allocate storage for {requested} slots")]
    AllocationFailed { requested: usize },
    #[error("Invalid map configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to parse map configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl MapError {
    /// Returns `true` for errors caused by the caller breaking an operation's precondition.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            MapError::KeyNotFound
                | MapError::KeyAlreadyExists
                | MapError::EmptyMap
                | MapError::ValueNotFound
        )
    }
}

impl PartialEq for MapError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MapError::KeyNotFound, MapError::KeyNotFound)
            | (MapError::KeyAlreadyExists, MapError::KeyAlreadyExists)
            | (MapError::EmptyMap, MapError::EmptyMap)
            | (MapError::ValueNotFound, MapError::ValueNotFound) => true,
            (
                MapError::AllocationFailed { requested: a },
                MapError::AllocationFailed { requested: b },
            ) => a == b,
            (MapError::InvalidConfig(a), MapError::InvalidConfig(b)) => a == b,
            // toml errors carry spans and are not comparable
            (MapError::ConfigParse(a), MapError::ConfigParse(b)) => a.message() == b.message(),
            _ => false,
        }
    }
}
