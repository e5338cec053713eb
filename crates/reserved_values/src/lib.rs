//! # Reserved Values
//!
//! A reservation authority for text pattern generation.
//!
//! All allocation state is owned by a single store task. Callers talk to it
//! through a clonable [`ReservedValueStore`] handle, so concurrent requests
//! are serialised by the task and no value is handed out twice. When a
//! persistence path is configured, every allocation is written to disk
//! before the caller receives the values.
//!
//! ## Examples
//!
//! ```no_run
//! use std::collections::HashMap;
//! use reserved_values::{ReservedValueStore, StoreConfig};
//! use text_pattern::{OwnerId, TextPattern, TextPatternService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (store, _task) = ReservedValueStore::spawn(StoreConfig {
//!     persistence_path: Some("reserved-values.json".into()),
//!     ..StoreConfig::default()
//! })
//! .await?;
//!
//! let pattern: TextPattern = "EN-SEQUENTIAL(####)".parse()?;
//! let pattern = pattern.with_owner(OwnerId::new("enrollment")?);
//!
//! let service = TextPatternService::new(store);
//! let code = service.resolve_pattern(&pattern, &HashMap::new()).await?;
//! println!("{code}");
//! # Ok(())
//! # }
//! ```

mod config;
mod errors;
mod state;
mod store;

pub use config::StoreConfig;
pub use errors::StoreError;
pub use state::{ReservationState, SegmentState};
pub use store::ReservedValueStore;
