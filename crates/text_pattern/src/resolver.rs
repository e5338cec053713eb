//! Resolution of a text pattern into a concrete string.
//!
//! Resolution runs in two passes. The first pass walks the segments in
//! template order: required and optional values are validated and formatted
//! immediately, fixed segments are rendered, and optional generated segments
//! without a supplied value are left as deferred slots. The second pass asks
//! the reservation authority for one value per deferred slot, in the order
//! the slots were discovered, and fills each slot.
//!
//! Deferred slots are structural: the draft keeps resolved text and slots
//! as separate parts, so a generated value can never be substituted into
//! the wrong place, whatever text surrounds it.

use std::collections::HashMap;

use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info, warn};

use crate::errors::ResolveError;
use crate::method::{render_date, Participation, TextPatternMethod};
use crate::pattern::TextPattern;
use crate::reservation::{ReservationAuthority, ReservationError};
use crate::segment::TextPatternSegment;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Resolve `pattern` against caller-supplied `values`, keyed by raw segment.
///
/// Current-date segments are rendered with the local time.
///
/// # Errors
/// Any [`ResolveError`] aborts resolution. Failures raised before generation
/// consume no reservations; a failure during generation leaves earlier
/// reservations consumed.
pub async fn resolve_pattern<A>(
    authority: &A,
    pattern: &TextPattern,
    values: &HashMap<String, String>,
) -> Result<String, ResolveError>
where
    A: ReservationAuthority + ?Sized,
{
    resolve_pattern_at(authority, pattern, values, &Local::now()).await
}

/// Same as [`resolve_pattern`], rendering current-date segments for `now`.
pub async fn resolve_pattern_at<A, Tz>(
    authority: &A,
    pattern: &TextPattern,
    values: &HashMap<String, String>,
    now: &DateTime<Tz>,
) -> Result<String, ResolveError>
where
    A: ReservationAuthority + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut draft = Draft::default();

    for segment in pattern.segments() {
        let supplied = values.get(segment.raw_segment());

        match segment.participation() {
            Participation::Required => {
                draft.push(apply_required_policy(segment, supplied)?);
            }
            Participation::Optional => match supplied {
                Some(value) => draft.push(apply_optional_policy(segment, value)?),
                None if segment.is_generated() => {
                    debug!(segment = %segment, "Deferring generated segment");
                    draft.defer(segment);
                }
                None => {
                    return Err(ResolveError::UnresolvableOptionalValue {
                        segment: segment.raw_segment().to_string(),
                    });
                }
            },
            Participation::Fixed => draft.push(fixed_value(segment, now)),
        }
    }

    let slots = draft.deferred_slots();
    if slots.is_empty() {
        return Ok(draft.finish());
    }

    let owner = pattern.owner().ok_or_else(|| ResolveError::OwnerNotAssigned {
        segment: slots[0].1.raw_segment().to_string(),
    })?;

    // One context key for every slot, taken before any slot is filled.
    let context_key = draft.context_key();

    for &(slot, segment) in &slots {
        debug!(
            owner = %owner,
            context = %context_key,
            segment = %segment,
            "Reserving generated value"
        );

        let value = authority
            .generate_and_reserve_values(owner, &context_key, segment, 1)
            .await
            .and_then(single_value)
            .map_err(|source| {
                warn!(segment = %segment, error = %source, "Reservation failed");
                ResolveError::Reservation {
                    segment: segment.raw_segment().to_string(),
                    source,
                }
            })?;

        draft.fill(slot, value);
    }

    info!(
        owner = %owner,
        reservations = slots.len(),
        "Resolved text pattern with generated values"
    );

    Ok(draft.finish())
}

/// Required values are formatted first; the formatted result is validated.
fn apply_required_policy(
    segment: &TextPatternSegment,
    supplied: Option<&String>,
) -> Result<String, ResolveError> {
    let value = supplied.ok_or_else(|| ResolveError::MissingRequiredValue {
        segment: segment.raw_segment().to_string(),
    })?;

    match segment.format_value(value) {
        Some(formatted) if segment.validate_value(&formatted) => Ok(formatted),
        _ => Err(ResolveError::InvalidValue {
            segment: segment.raw_segment().to_string(),
            value: value.clone(),
        }),
    }
}

/// Supplied optional values are validated raw, before formatting.
fn apply_optional_policy(segment: &TextPatternSegment, value: &str) -> Result<String, ResolveError> {
    let invalid = || ResolveError::InvalidOptionalValue {
        segment: segment.raw_segment().to_string(),
        value: value.to_string(),
    };

    if !segment.validate_value(value) {
        return Err(invalid());
    }

    segment.format_value(value).ok_or_else(invalid)
}

fn fixed_value<Tz>(segment: &TextPatternSegment, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match segment.method() {
        TextPatternMethod::CurrentDate => render_date(segment.parameter(), now),
        _ => segment.parameter().to_string(),
    }
}

fn single_value(values: Vec<String>) -> Result<String, ReservationError> {
    let received = values.len();
    match <[String; 1]>::try_from(values) {
        Ok([value]) => Ok(value),
        Err(_) => Err(ReservationError::CountMismatch {
            requested: 1,
            received,
        }),
    }
}

#[derive(Debug)]
enum Part<'p> {
    Resolved(String),
    Deferred(&'p TextPatternSegment),
}

/// Working result of the first pass.
#[derive(Debug, Default)]
struct Draft<'p> {
    parts: Vec<Part<'p>>,
}

impl<'p> Draft<'p> {
    fn push(&mut self, text: String) {
        self.parts.push(Part::Resolved(text));
    }

    fn defer(&mut self, segment: &'p TextPatternSegment) {
        self.parts.push(Part::Deferred(segment));
    }

    /// Deferred slots in discovery order, as `(part index, segment)`.
    fn deferred_slots(&self) -> Vec<(usize, &'p TextPatternSegment)> {
        self.parts
            .iter()
            .enumerate()
            .filter_map(|(index, part)| match part {
                Part::Deferred(segment) => Some((index, *segment)),
                Part::Resolved(_) => None,
            })
            .collect()
    }

    /// Resolved text with every deferred slot rendered as its parameter,
    /// e.g. `ABC-##` for `TEXT(ABC)-SEQUENTIAL(##)`.
    fn context_key(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Resolved(text) => text.as_str(),
                Part::Deferred(segment) => segment.parameter(),
            })
            .collect()
    }

    fn fill(&mut self, slot: usize, value: String) {
        if let Some(part) = self.parts.get_mut(slot) {
            *part = Part::Resolved(value);
        }
    }

    fn finish(self) -> String {
        self.parts
            .into_iter()
            .map(|part| match part {
                Part::Resolved(text) => text,
                Part::Deferred(segment) => segment.raw_segment().to_string(),
            })
            .collect()
    }
}
