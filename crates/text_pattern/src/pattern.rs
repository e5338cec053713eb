//! Parsed text patterns and the owner they reserve values for.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ParseError, ValidationError};
use crate::segment::TextPatternSegment;

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;

/// Validated identifier of the entity a pattern is attached to.
///
/// Generated values are reserved under this owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new owner identifier with validation
    ///
    /// # Validation Rules
    /// - Length: 1-64 characters
    /// - Characters: alphanumeric, hyphens, underscores, periods
    ///
    /// # Errors
    /// Returns `ValidationError` if validation fails
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();

        if id.is_empty() {
            return Err(ValidationError::empty_field("owner_id"));
        }

        if id.len() > 64 {
            return Err(ValidationError::too_long("owner_id", id.len(), 64));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(ValidationError::invalid_format(
                "owner_id",
                "must contain only alphanumeric characters, hyphens, underscores, or periods",
            ));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}

/// An ordered, immutable sequence of segments plus the owner under which
/// generated values are reserved.
///
/// Resolution never mutates a pattern; binding an owner produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPattern {
    segments: Vec<TextPatternSegment>,
    owner: Option<OwnerId>,
}

impl TextPattern {
    pub fn new(segments: Vec<TextPatternSegment>) -> Self {
        Self {
            segments,
            owner: None,
        }
    }

    /// Bind the pattern to its owning entity.
    pub fn with_owner(mut self, owner: OwnerId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn segments(&self) -> &[TextPatternSegment] {
        &self.segments
    }

    pub fn owner(&self) -> Option<&OwnerId> {
        self.owner.as_ref()
    }

    /// Whether any segment can have its value generated.
    pub fn has_generated_segments(&self) -> bool {
        self.segments.iter().any(TextPatternSegment::is_generated)
    }

    /// The template text, reassembled from the raw segments.
    pub fn raw(&self) -> String {
        self.segments
            .iter()
            .map(TextPatternSegment::raw_segment)
            .collect()
    }

    /// Lists the raw segments the caller must or may supply, in template order.
    pub fn required_values(&self) -> RequiredValues {
        let collect = |keep: fn(&TextPatternSegment) -> bool| -> Vec<String> {
            self.segments
                .iter()
                .filter(|s| keep(s))
                .map(|s| s.raw_segment().to_string())
                .collect()
        };

        RequiredValues {
            required: collect(TextPatternSegment::is_required),
            optional: collect(TextPatternSegment::is_optional),
        }
    }
}

impl FromStr for TextPattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

impl std::fmt::Display for TextPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// Summary of caller-suppliable segments, used for form generation.
///
/// Serialises as `{"REQUIRED": [...], "OPTIONAL": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredValues {
    #[serde(rename = "REQUIRED")]
    pub required: Vec<String>,

    #[serde(rename = "OPTIONAL")]
    pub optional: Vec<String>,
}
