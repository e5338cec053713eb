//! Interface to the authority that hands out unique generated values.

use async_trait::async_trait;
use thiserror::Error;

use crate::pattern::OwnerId;
use crate::segment::TextPatternSegment;

/// Failures reported by a [`ReservationAuthority`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("No more values available for '{segment_key}' owned by '{owner}'")]
    Exhausted { owner: String, segment_key: String },

    #[error("Reservation authority is unavailable: {message}")]
    Unavailable { message: String },

    #[error("Failed to record reserved values: {message}")]
    Storage { message: String },

    #[error("Requested {requested} values but received {received}")]
    CountMismatch { requested: usize, received: usize },

    #[error("Segment '{segment_key}' cannot be generated")]
    Unsupported { segment_key: String },
}

/// Allocates values that are unique within a reservation scope.
///
/// A scope is identified by the owner, the context key and the segment key
/// (the segment's raw text). Implementations must never return the same
/// value twice for one scope, even under concurrent callers, and must record
/// consumption durably before returning success.
#[async_trait]
pub trait ReservationAuthority: Send + Sync {
    /// Generates and reserves exactly `count` values for `segment`.
    ///
    /// # Arguments
    /// * `owner` - Entity the pattern is attached to
    /// * `context_key` - The partially resolved text surrounding the segment
    /// * `segment` - The generated segment; its raw text is the segment key
    /// * `count` - Number of values to reserve
    async fn generate_and_reserve_values(
        &self,
        owner: &OwnerId,
        context_key: &str,
        segment: &TextPatternSegment,
        count: usize,
    ) -> Result<Vec<String>, ReservationError>;
}

#[async_trait]
impl<T> ReservationAuthority for std::sync::Arc<T>
where
    T: ReservationAuthority + ?Sized,
{
    async fn generate_and_reserve_values(
        &self,
        owner: &OwnerId,
        context_key: &str,
        segment: &TextPatternSegment,
        count: usize,
    ) -> Result<Vec<String>, ReservationError> {
        (**self)
            .generate_and_reserve_values(owner, context_key, segment, count)
            .await
    }
}
