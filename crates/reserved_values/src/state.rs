//! Allocation state for reserved values.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use text_pattern::{OwnerId, ReservationError, TextPatternMethod, TextPatternSegment};

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;

const DIGITS: &[u8] = b"0123456789";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Everything handed out so far, nested by owner and segment key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationState {
    #[serde(default)]
    owners: BTreeMap<String, BTreeMap<String, SegmentState>>,
}

/// Allocation record of a single `(owner, segment key)` scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentState {
    /// Highest sequence number handed out, per context key.
    #[serde(default)]
    pub sequences: BTreeMap<String, u64>,

    /// Random values handed out, whatever their context.
    #[serde(default)]
    pub issued: BTreeSet<String>,
}

impl SegmentState {
    fn is_empty(&self) -> bool {
        self.sequences.is_empty() && self.issued.is_empty()
    }
}

impl ReservationState {
    /// Allocates `count` values for `segment` within the given scope.
    ///
    /// Either all values are reserved or none are. Nothing is recorded for a
    /// request that fails.
    pub fn reserve<R>(
        &mut self,
        owner: &OwnerId,
        context_key: &str,
        segment: &TextPatternSegment,
        count: usize,
        rng: &mut R,
        max_attempts: usize,
    ) -> Result<Vec<String>, ReservationError>
    where
        R: Rng + ?Sized,
    {
        let exhausted = || ReservationError::Exhausted {
            owner: owner.to_string(),
            segment_key: segment.raw_segment().to_string(),
        };

        if count == 0 && segment.is_generated() {
            return Ok(Vec::new());
        }

        match segment.method() {
            TextPatternMethod::Sequential => {
                let last = self.last_sequence(owner, segment.raw_segment(), context_key);
                let (values, last) = next_sequence(last.unwrap_or(0), segment.parameter().len(), count)
                    .ok_or_else(exhausted)?;
                self.segment_mut(owner, segment)
                    .sequences
                    .insert(context_key.to_string(), last);
                Ok(values)
            }
            TextPatternMethod::Random => {
                let values = draw_random(
                    segment.parameter(),
                    count,
                    rng,
                    max_attempts,
                    self.issued(owner, segment.raw_segment()),
                )
                .ok_or_else(exhausted)?;
                self.segment_mut(owner, segment)
                    .issued
                    .extend(values.iter().cloned());
                Ok(values)
            }
            _ => Err(ReservationError::Unsupported {
                segment_key: segment.raw_segment().to_string(),
            }),
        }
    }

    /// Gives back values from the most recent successful [`reserve`] call
    /// for the same scope, as if that call had never happened.
    ///
    /// [`reserve`]: ReservationState::reserve
    pub fn release(
        &mut self,
        owner: &OwnerId,
        context_key: &str,
        segment: &TextPatternSegment,
        values: &[String],
    ) {
        let Some(segments) = self.owners.get_mut(owner.as_str()) else {
            return;
        };
        let Some(state) = segments.get_mut(segment.raw_segment()) else {
            return;
        };

        match segment.method() {
            TextPatternMethod::Sequential => {
                if let Some(last) = state.sequences.get_mut(context_key) {
                    *last = last.saturating_sub(values.len() as u64);
                    if *last == 0 {
                        state.sequences.remove(context_key);
                    }
                }
            }
            TextPatternMethod::Random => {
                for value in values {
                    state.issued.remove(value);
                }
            }
            _ => {}
        }

        if state.is_empty() {
            segments.remove(segment.raw_segment());
        }
        if segments.is_empty() {
            self.owners.remove(owner.as_str());
        }
    }

    /// The highest sequence number handed out in a context, if any.
    pub fn last_sequence(&self, owner: &OwnerId, segment_key: &str, context_key: &str) -> Option<u64> {
        self.segment(owner, segment_key)?
            .sequences
            .get(context_key)
            .copied()
    }

    /// Random values handed out for a segment, if any.
    pub fn issued(&self, owner: &OwnerId, segment_key: &str) -> Option<&BTreeSet<String>> {
        self.segment(owner, segment_key).map(|state| &state.issued)
    }

    fn segment(&self, owner: &OwnerId, segment_key: &str) -> Option<&SegmentState> {
        self.owners.get(owner.as_str())?.get(segment_key)
    }

    fn segment_mut(&mut self, owner: &OwnerId, segment: &TextPatternSegment) -> &mut SegmentState {
        self.owners
            .entry(owner.to_string())
            .or_default()
            .entry(segment.raw_segment().to_string())
            .or_default()
    }
}

/// The values after `last` and the new highest value, or `None` once the
/// width runs out.
fn next_sequence(last: u64, width: usize, count: usize) -> Option<(Vec<String>, u64)> {
    let max = u32::try_from(width)
        .ok()
        .and_then(|width| 10u64.checked_pow(width))
        .map_or(u64::MAX, |n| n - 1);
    let next_last = last.checked_add(count as u64)?;
    if next_last > max {
        return None;
    }

    let values = (last + 1..=next_last)
        .map(|n| format!("{n:0width$}"))
        .collect();
    Some((values, next_last))
}

fn draw_random<R>(
    mask: &str,
    count: usize,
    rng: &mut R,
    max_attempts: usize,
    issued: Option<&BTreeSet<String>>,
) -> Option<Vec<String>>
where
    R: Rng + ?Sized,
{
    let mut batch = BTreeSet::new();

    while batch.len() < count {
        let fresh = (0..max_attempts)
            .map(|_| random_value(mask, rng))
            .find(|candidate| {
                !batch.contains(candidate) && !issued.is_some_and(|issued| issued.contains(candidate))
            })?;
        batch.insert(fresh);
    }

    Some(batch.into_iter().collect())
}

fn random_value<R>(mask: &str, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    mask.chars()
        .map(|c| {
            let alphabet = match c {
                '#' => DIGITS,
                'X' => UPPER,
                'x' => LOWER,
                _ => ALPHANUMERIC,
            };
            alphabet[rng.gen_range(0..alphabet.len())] as char
        })
        .collect()
}
