//! A single classified unit of a text pattern.

use regex::Regex;

use crate::errors::ParseError;
use crate::method::{Participation, TextPatternMethod};

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;

/// One segment of a parsed text pattern.
///
/// The raw segment is the original template substring. It is the key used
/// to look up caller-supplied values and the segment key handed to the
/// reservation authority.
#[derive(Debug, Clone)]
pub struct TextPatternSegment {
    method: TextPatternMethod,
    parameter: String,
    raw_segment: String,
    shape: Regex,
}

impl TextPatternSegment {
    /// Create a segment, checking the parameter and compiling its shape rule.
    ///
    /// # Errors
    /// Returns `ParseError::EmptyParameter` or `ParseError::InvalidParameter`
    /// when the parameter does not suit the method.
    pub fn new(method: TextPatternMethod, parameter: impl Into<String>) -> Result<Self, ParseError> {
        let parameter = parameter.into();
        let keyword = method.keyword().unwrap_or("LITERAL");

        if parameter.is_empty() {
            return Err(ParseError::EmptyParameter {
                keyword: keyword.to_string(),
            });
        }

        method
            .validate_parameter(&parameter)
            .map_err(|reason| ParseError::InvalidParameter {
                keyword: keyword.to_string(),
                parameter: parameter.clone(),
                reason,
            })?;

        let shape = Regex::new(&format!("^{}$", method.shape_fragment(&parameter))).map_err(
            |e| ParseError::InvalidParameter {
                keyword: keyword.to_string(),
                parameter: parameter.clone(),
                reason: e.to_string(),
            },
        )?;

        let raw_segment = match method.keyword() {
            Some(kw) => format!("{kw}({parameter})"),
            None => parameter.clone(),
        };

        Ok(Self {
            method,
            parameter,
            raw_segment,
            shape,
        })
    }

    /// Literal text segment.
    pub fn literal(text: impl Into<String>) -> Result<Self, ParseError> {
        Self::new(TextPatternMethod::Literal, text)
    }

    pub fn method(&self) -> TextPatternMethod {
        self.method
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn raw_segment(&self) -> &str {
        &self.raw_segment
    }

    pub fn participation(&self) -> Participation {
        self.method.participation()
    }

    pub fn is_required(&self) -> bool {
        self.method.is_required()
    }

    pub fn is_optional(&self) -> bool {
        self.method.is_optional()
    }

    pub fn is_generated(&self) -> bool {
        self.method.is_generated()
    }

    /// Whether `value` satisfies this segment's shape rule.
    pub fn validate_value(&self, value: &str) -> bool {
        self.shape.is_match(value)
    }

    /// Runs the method's format function over `value`.
    pub fn format_value(&self, value: &str) -> Option<String> {
        self.method.format_value(&self.parameter, value)
    }

    /// Unanchored shape rule, used to assemble whole-pattern validation.
    pub(crate) fn shape_fragment(&self) -> String {
        self.method.shape_fragment(&self.parameter)
    }
}

impl PartialEq for TextPatternSegment {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.parameter == other.parameter
    }
}

impl Eq for TextPatternSegment {}

impl std::fmt::Display for TextPatternSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw_segment)
    }
}
