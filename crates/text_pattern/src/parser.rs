//! Parser turning a raw template string into an ordered list of segments.
//!
//! A known method keyword immediately followed by `(` opens a method segment
//! whose parameter runs to the matching `)`. Parentheses inside the parameter
//! nest, and a backslash escapes the character after it. Everything else is
//! literal text, grouped into one literal segment per uninterrupted run.
//!
//! ```text
//! ORG_UNIT_CODE(...)-CURRENT_DATE(yyyy)-SEQUENTIAL(####)
//! └───── method ───┘│└──── method ─────┘│└─── method ───┘
//!                literal              literal
//! ```

use tracing::debug;

use crate::errors::ParseError;
use crate::method::TextPatternMethod;
use crate::pattern::TextPattern;
use crate::segment::TextPatternSegment;

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

/// Parse a raw template into a [`TextPattern`] with no owner bound.
///
/// # Errors
/// Returns a [`ParseError`] for blank templates, unclosed methods and
/// parameters that do not suit their method.
pub fn parse(raw: &str) -> Result<TextPattern, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut position = 0;

    while let Some(current) = raw[position..].chars().next() {
        let rest = &raw[position..];

        if let Some((keyword, method)) = method_at(rest) {
            if !literal.is_empty() {
                segments.push(TextPatternSegment::literal(std::mem::take(&mut literal))?);
            }

            let open = position + keyword.len() + 1;
            let close = matching_paren(raw, open).ok_or_else(|| ParseError::UnclosedMethod {
                keyword: keyword.to_string(),
                position,
            })?;

            segments.push(TextPatternSegment::new(method, &raw[open..close])?);
            position = close + 1;
            continue;
        }

        literal.push(current);
        position += current.len_utf8();
    }

    if !literal.is_empty() {
        segments.push(TextPatternSegment::literal(literal)?);
    }

    debug!(template = raw, segments = segments.len(), "Parsed text pattern");

    Ok(TextPattern::new(segments))
}

fn method_at(rest: &str) -> Option<(&'static str, TextPatternMethod)> {
    TextPatternMethod::keywords().find(|(keyword, _)| {
        rest.strip_prefix(keyword)
            .is_some_and(|tail| tail.starts_with('('))
    })
}

fn matching_paren(raw: &str, start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut chars = raw[start..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}
