//! Reservation authority double shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::pattern::OwnerId;
use crate::reservation::{ReservationAuthority, ReservationError};
use crate::segment::TextPatternSegment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub owner: String,
    pub context_key: String,
    pub segment_key: String,
    pub count: usize,
}

/// Hands out queued responses in order and records every request.
#[derive(Default)]
pub struct MockAuthority {
    responses: Mutex<VecDeque<Result<Vec<String>, ReservationError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockAuthority {
    pub fn returning(values: &[&str]) -> Self {
        let mock = Self::default();
        for value in values {
            mock.push_response(Ok(vec![value.to_string()]));
        }
        mock
    }

    pub fn push_response(&self, response: Result<Vec<String>, ReservationError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReservationAuthority for MockAuthority {
    async fn generate_and_reserve_values(
        &self,
        owner: &OwnerId,
        context_key: &str,
        segment: &TextPatternSegment,
        count: usize,
    ) -> Result<Vec<String>, ReservationError> {
        self.calls.lock().unwrap().push(RecordedCall {
            owner: owner.to_string(),
            context_key: context_key.to_string(),
            segment_key: segment.raw_segment().to_string(),
            count,
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ReservationError::Exhausted {
                    owner: owner.to_string(),
                    segment_key: segment.raw_segment().to_string(),
                })
            })
    }
}
