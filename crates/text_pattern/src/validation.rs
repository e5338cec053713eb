//! Shape validation of segment values and of complete generated texts.

use regex::Regex;
use tracing::warn;

use crate::pattern::TextPattern;
use crate::segment::TextPatternSegment;

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;

/// Whether `value` satisfies the shape rule of `segment`'s method.
pub fn validate_segment_value(segment: &TextPatternSegment, value: &str) -> bool {
    segment.validate_value(value)
}

/// Whether `text` could have been produced by resolving `pattern`.
///
/// Every segment contributes its shape rule to one anchored expression;
/// literal segments must appear verbatim.
pub fn validate_text_pattern_value(pattern: &TextPattern, text: &str) -> bool {
    let expression: String = pattern
        .segments()
        .iter()
        .map(TextPatternSegment::shape_fragment)
        .collect();

    match Regex::new(&format!("^{expression}$")) {
        Ok(regex) => regex.is_match(text),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Could not build validation expression");
            false
        }
    }
}
