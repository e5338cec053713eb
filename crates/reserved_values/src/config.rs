use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for a [`ReservedValueStore`](crate::ReservedValueStore).
///
/// # Example TOML Configuration
///
/// ```toml
/// persistence_path = "/var/lib/text-pattern/reserved-values.json"
/// random_max_attempts = 100
/// channel_capacity = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// File the allocation state is persisted to. In-memory only when unset.
    pub persistence_path: Option<PathBuf>,

    /// Attempts at drawing an unused random value before the scope counts as exhausted.
    pub random_max_attempts: usize,

    /// Number of requests that may queue for the store task.
    pub channel_capacity: usize,

    /// Fixed seed for random generation; drawn from entropy when unset.
    pub random_seed: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persistence_path: None,
            random_max_attempts: 100,
            channel_capacity: 64,
            random_seed: None,
        }
    }
}
