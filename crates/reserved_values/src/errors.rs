use std::path::PathBuf;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while starting a [`ReservedValueStore`](crate::ReservedValueStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read reserved value state from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Reserved value state in {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
