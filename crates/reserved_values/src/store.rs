//! The store task and the handle callers use to reach it.

use std::path::Path;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use text_pattern::{OwnerId, ReservationAuthority, ReservationError, TextPatternSegment};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::state::ReservationState;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

type Reply = oneshot::Sender<Result<Vec<String>, ReservationError>>;

#[derive(Debug)]
struct ReserveCommand {
    owner: OwnerId,
    context_key: String,
    segment: TextPatternSegment,
    count: usize,
    reply: Reply,
}

/// Handle to the task that owns all reservation state.
///
/// Cloning the handle is cheap; every clone talks to the same task. The task
/// stops once the last handle is dropped.
#[derive(Debug, Clone)]
pub struct ReservedValueStore {
    sender: mpsc::Sender<ReserveCommand>,
}

impl ReservedValueStore {
    /// Load any persisted state and start the store task.
    ///
    /// Returns the handle together with the task's `JoinHandle`; the task
    /// finishes once every handle has been dropped. Must be called from
    /// within a tokio runtime.
    ///
    /// # Errors
    /// Returns `StoreError` when the persisted state cannot be read or parsed.
    /// A missing state file is treated as an empty store.
    pub async fn spawn(config: StoreConfig) -> Result<(Self, JoinHandle<()>), StoreError> {
        let state = match &config.persistence_path {
            Some(path) => load_state(path).await?,
            None => ReservationState::default(),
        };

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));

        info!(
            persistence_path = ?config.persistence_path,
            "Starting reserved value store"
        );

        let actor = StoreActor {
            state,
            config,
            rng,
            receiver,
        };
        let task = tokio::spawn(actor.run());

        Ok((Self { sender }, task))
    }
}

#[async_trait]
impl ReservationAuthority for ReservedValueStore {
    async fn generate_and_reserve_values(
        &self,
        owner: &OwnerId,
        context_key: &str,
        segment: &TextPatternSegment,
        count: usize,
    ) -> Result<Vec<String>, ReservationError> {
        let (reply, response) = oneshot::channel();

        self.sender
            .send(ReserveCommand {
                owner: owner.clone(),
                context_key: context_key.to_string(),
                segment: segment.clone(),
                count,
                reply,
            })
            .await
            .map_err(|_| ReservationError::Unavailable {
                message: "reserved value store has stopped".to_string(),
            })?;

        response.await.map_err(|_| ReservationError::Unavailable {
            message: "reserved value store dropped the request".to_string(),
        })?
    }
}

struct StoreActor {
    state: ReservationState,
    config: StoreConfig,
    rng: StdRng,
    receiver: mpsc::Receiver<ReserveCommand>,
}

impl StoreActor {
    async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            let ReserveCommand {
                owner,
                context_key,
                segment,
                count,
                reply,
            } = command;

            let result = self.reserve(&owner, &context_key, &segment, count).await;

            if reply.send(result).is_err() {
                warn!(
                    owner = %owner,
                    segment = %segment,
                    "Caller went away before receiving reserved values; they stay reserved"
                );
            }
        }

        debug!("Reserved value store stopped");
    }

    async fn reserve(
        &mut self,
        owner: &OwnerId,
        context_key: &str,
        segment: &TextPatternSegment,
        count: usize,
    ) -> Result<Vec<String>, ReservationError> {
        let values = self.state.reserve(
            owner,
            context_key,
            segment,
            count,
            &mut self.rng,
            self.config.random_max_attempts,
        )?;

        if let Some(path) = &self.config.persistence_path {
            if let Err(message) = persist_state(path, &self.state).await {
                error!(path = ?path, error = %message, "Failed to persist reserved values");
                self.state.release(owner, context_key, segment, &values);
                return Err(ReservationError::Storage { message });
            }
        }

        debug!(
            owner = %owner,
            segment = %segment,
            count = values.len(),
            "Reserved values"
        );

        Ok(values)
    }
}

async fn load_state(path: &Path) -> Result<ReservationState, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = ?path, "No persisted reserved value state; starting empty");
            Ok(ReservationState::default())
        }
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes the state next to `path`, flushes it to disk and renames it into
/// place.
async fn persist_state(path: &Path, state: &ReservationState) -> Result<(), String> {
    let content = serde_json::to_vec_pretty(state).map_err(|e| e.to_string())?;
    let staging = path.with_extension("tmp");

    let mut file = tokio::fs::File::create(&staging)
        .await
        .map_err(|e| format!("creating {staging:?}: {e}"))?;
    file.write_all(&content)
        .await
        .map_err(|e| format!("writing {staging:?}: {e}"))?;
    file.sync_all()
        .await
        .map_err(|e| format!("syncing {staging:?}: {e}"))?;
    drop(file);

    tokio::fs::rename(&staging, path)
        .await
        .map_err(|e| format!("replacing {path:?}: {e}"))?;

    sync_parent_dir(path).await
}

/// Makes the rename itself durable.
#[cfg(unix)]
async fn sync_parent_dir(path: &Path) -> Result<(), String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = tokio::fs::File::open(parent)
        .await
        .map_err(|e| format!("opening {parent:?}: {e}"))?;
    dir.sync_all()
        .await
        .map_err(|e| format!("syncing {parent:?}: {e}"))
}

#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) -> Result<(), String> {
    Ok(())
}
