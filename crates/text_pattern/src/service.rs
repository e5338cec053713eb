//! Service facade bundling resolution, introspection and validation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ParseError, ResolveError};
use crate::parser::parse;
use crate::pattern::{OwnerId, RequiredValues, TextPattern};
use crate::reservation::ReservationAuthority;
use crate::resolver::resolve_pattern;
use crate::validation::validate_text_pattern_value;

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

/// An entity attribute whose values may be produced from a text pattern.
///
/// The parsed pattern is cached on first use and bound to the attribute's
/// uid, which becomes the owner of every reserved value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAttribute {
    pub uid: OwnerId,
    pub pattern: String,
    pub generated: bool,
    #[serde(skip)]
    text_pattern: Option<TextPattern>,
}

impl GeneratedAttribute {
    pub fn new(uid: OwnerId, pattern: impl Into<String>, generated: bool) -> Self {
        Self {
            uid,
            pattern: pattern.into(),
            generated,
            text_pattern: None,
        }
    }

    /// The attribute's bound pattern, parsed on first access.
    ///
    /// Attributes that are not generated never get a pattern.
    pub fn text_pattern(&mut self) -> Result<Option<&TextPattern>, ParseError> {
        if self.text_pattern.is_none() && self.generated {
            debug!(attribute = %self.uid, "Parsing text pattern for attribute");
            let parsed = parse(&self.pattern)?.with_owner(self.uid.clone());
            self.text_pattern = Some(parsed);
        }

        Ok(self.text_pattern.as_ref())
    }
}

/// Entry point for callers that produce identifiers from text patterns.
pub struct TextPatternService<A> {
    authority: A,
}

impl<A> TextPatternService<A>
where
    A: ReservationAuthority,
{
    pub fn new(authority: A) -> Self {
        Self { authority }
    }

    pub fn authority(&self) -> &A {
        &self.authority
    }

    /// Resolve a pattern, reserving one value per generated segment left open.
    pub async fn resolve_pattern(
        &self,
        pattern: &TextPattern,
        values: &HashMap<String, String>,
    ) -> Result<String, ResolveError> {
        resolve_pattern(&self.authority, pattern, values).await
    }

    /// Raw segments the caller must or may supply, for form generation.
    pub fn required_values(&self, pattern: &TextPattern) -> RequiredValues {
        pattern.required_values()
    }

    /// Whether `text` is a value `pattern` could have produced.
    pub fn validate(&self, pattern: &TextPattern, text: &str) -> bool {
        validate_text_pattern_value(pattern, text)
    }

    /// The owner-bound pattern of a generated attribute.
    pub fn text_pattern_for<'a>(
        &self,
        attribute: &'a mut GeneratedAttribute,
    ) -> Result<Option<&'a TextPattern>, ParseError> {
        attribute.text_pattern()
    }
}
