//! # Text Pattern
//!
//! Resolves text patterns (templates made of literal text, caller-supplied
//! fields and system-generated unique fields) into concrete identifiers.
//!
//! ## Overview
//!
//! A template such as `ORG_UNIT_CODE(...)-CURRENT_DATE(yyyy)-SEQUENTIAL(####)`
//! is parsed into an ordered [`TextPattern`]. Resolution then:
//! 1. Validates and formats caller-supplied values for required and optional segments
//! 2. Renders fixed segments (literal text, the current date)
//! 3. Defers generated segments the caller left out
//! 4. Reserves one unique value per deferred segment from a [`ReservationAuthority`]
//!
//! ## Examples
//!
//! ```no_run
//! use std::collections::HashMap;
//! use text_pattern::{OwnerId, ReservationAuthority, TextPattern, TextPatternService};
//!
//! # async fn example(authority: impl ReservationAuthority) -> Result<(), Box<dyn std::error::Error>> {
//! let pattern: TextPattern = "ORG_UNIT_CODE(...)-SEQUENTIAL(####)".parse()?;
//! let pattern = pattern.with_owner(OwnerId::new("Jdbf4BiTWlY")?);
//!
//! let mut values = HashMap::new();
//! values.insert("ORG_UNIT_CODE(...)".to_string(), "OSLO01".to_string());
//!
//! let service = TextPatternService::new(authority);
//! let code = service.resolve_pattern(&pattern, &values).await?;
//! assert!(service.validate(&pattern, &code));
//! # Ok(())
//! # }
//! ```

mod errors;
pub use errors::{ParseError, ResolveError, ValidationError};

/// Method kinds and their classification
pub mod method;

/// Segment model
pub mod segment;

/// Patterns and owner binding
pub mod pattern;

/// Template parser
pub mod parser;

/// Shape validation
pub mod validation;

/// Reservation authority interface
pub mod reservation;

/// Deferred-generation resolver
pub mod resolver;

/// Service facade
pub mod service;

#[cfg(test)]
mod test_support;

pub use method::{Participation, TextPatternMethod};
pub use parser::parse;
pub use pattern::{OwnerId, RequiredValues, TextPattern};
pub use reservation::{ReservationAuthority, ReservationError};
pub use resolver::{resolve_pattern, resolve_pattern_at};
pub use segment::TextPatternSegment;
pub use service::{GeneratedAttribute, TextPatternService};
pub use validation::{validate_segment_value, validate_text_pattern_value};
