use thiserror::Error;

use crate::reservation::ReservationError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Validation failure for the branded types of this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' is too long: {actual} characters (maximum {max})")]
    TooLong {
        field: String,
        actual: usize,
        max: usize,
    },

    #[error("Field '{field}' has an invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: &str) -> Self {
        Self::EmptyField {
            field: field.to_string(),
        }
    }

    pub fn too_long(field: &str, actual: usize, max: usize) -> Self {
        Self::TooLong {
            field: field.to_string(),
            actual,
            max,
        }
    }

    pub fn invalid_format(field: &str, reason: &str) -> Self {
        Self::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors produced while turning a raw template string into a [`TextPattern`].
///
/// [`TextPattern`]: crate::TextPattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The template contains no segments at all.
    #[error("Text pattern is empty")]
    Empty,

    /// A method keyword was opened with `(` but never closed.
    #[error("Method {keyword} opened at position {position} is never closed")]
    UnclosedMethod { keyword: String, position: usize },

    /// A method was written with an empty parameter, e.g. `SEQUENTIAL()`.
    #[error("Method {keyword} requires a parameter")]
    EmptyParameter { keyword: String },

    /// The parameter does not follow the syntax of its method.
    #[error("Invalid parameter '{parameter}' for method {keyword}: {reason}")]
    InvalidParameter {
        keyword: String,
        parameter: String,
        reason: String,
    },
}

/// Errors that abort the resolution of a text pattern.
///
/// None of these are retried internally. Reservations consumed before a
/// failure are not rolled back; the caller must discard any partial result.
///
/// # Examples
///
/// ```rust,ignore
/// match service.resolve_pattern(&pattern, &values).await {
///     Ok(code) => println!("Generated {code}"),
///     Err(ResolveError::MissingRequiredValue { segment }) => {
///         eprintln!("Please supply a value for {segment}");
///     }
///     Err(e) => eprintln!("Could not generate value: {e}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A REQUIRED segment has no entry in the supplied values.
    #[error("Missing required value for segment '{segment}'")]
    MissingRequiredValue { segment: String },

    /// A REQUIRED value could not be formatted, or its formatted form failed
    /// the segment's shape rule.
    #[error("Value is invalid: {segment} -> {value}")]
    InvalidValue { segment: String, value: String },

    /// A supplied OPTIONAL value failed the segment's shape rule.
    #[error("Supplied optional value is invalid: {segment} -> {value}")]
    InvalidOptionalValue { segment: String, value: String },

    /// An OPTIONAL segment was omitted and its method cannot generate values.
    #[error("Segment '{segment}' has no value and cannot be generated")]
    UnresolvableOptionalValue { segment: String },

    /// Generation is needed but the pattern was never bound to an owner.
    #[error("Pattern has no owner; cannot reserve a value for segment '{segment}'")]
    OwnerNotAssigned { segment: String },

    /// The reservation authority failed to hand out a value.
    #[error("Reservation failed for segment '{segment}': {source}")]
    Reservation {
        segment: String,
        #[source]
        source: ReservationError,
    },
}
