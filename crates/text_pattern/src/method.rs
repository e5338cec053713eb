//! Method kinds available to text pattern segments.
//!
//! Every method has two orthogonal classifications: its [`Participation`]
//! (whether the caller must, may, or cannot supply a value) and whether the
//! reservation authority can manufacture a value for it. Each method also
//! owns the syntax of its parameter, its format function and its shape rule.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "method_tests.rs"]
mod tests;

/// How a segment takes part in resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participation {
    /// The caller must supply a value.
    Required,
    /// The caller may supply a value or leave it to generation.
    Optional,
    /// No caller input; the value is literal or computed.
    Fixed,
}

/// The closed set of methods a segment can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextPatternMethod {
    /// Literal text copied into the result.
    Literal,
    /// The current date rendered with a date format.
    CurrentDate,
    /// Free text matching a character mask.
    Text,
    /// Like [`TextPatternMethod::Text`], but the caller may leave it out.
    /// There is nothing to generate, so an omitted value cannot be resolved.
    OptionalText,
    /// A prefix or suffix of an organisation unit code.
    OrgUnitCode,
    /// A random value drawn from a character mask.
    Random,
    /// A zero-padded sequence number.
    Sequential,
}

static KEYWORDS: [(&str, TextPatternMethod); 6] = [
    ("CURRENT_DATE", TextPatternMethod::CurrentDate),
    ("ORG_UNIT_CODE", TextPatternMethod::OrgUnitCode),
    ("SEQUENTIAL", TextPatternMethod::Sequential),
    ("RANDOM", TextPatternMethod::Random),
    ("OPTIONAL_TEXT", TextPatternMethod::OptionalText),
    ("TEXT", TextPatternMethod::Text),
];

impl TextPatternMethod {
    /// Looks up a method by its template keyword, e.g. `SEQUENTIAL`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == keyword)
            .map(|(_, method)| *method)
    }

    /// All method keywords with their methods.
    pub fn keywords() -> impl Iterator<Item = (&'static str, TextPatternMethod)> {
        KEYWORDS.iter().copied()
    }

    /// The template keyword, or `None` for literal text.
    pub fn keyword(&self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(_, method)| method == self)
            .map(|(kw, _)| *kw)
    }

    pub fn participation(&self) -> Participation {
        match self {
            Self::Literal | Self::CurrentDate => Participation::Fixed,
            Self::Text | Self::OrgUnitCode => Participation::Required,
            Self::OptionalText | Self::Random | Self::Sequential => Participation::Optional,
        }
    }

    pub fn is_required(&self) -> bool {
        self.participation() == Participation::Required
    }

    pub fn is_optional(&self) -> bool {
        self.participation() == Participation::Optional
    }

    /// Whether the reservation authority can manufacture a value for this method.
    ///
    /// Only optional methods are ever generation-capable.
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Random | Self::Sequential)
    }

    /// Checks the parameter against the method's parameter syntax.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate_parameter(&self, parameter: &str) -> Result<(), String> {
        match self {
            Self::Literal | Self::CurrentDate | Self::Text | Self::OptionalText => Ok(()),
            Self::OrgUnitCode => {
                let body = parameter.strip_prefix('^').unwrap_or(parameter);
                let body = body.strip_suffix('$').unwrap_or(body);
                if parameter.starts_with('^') && parameter.ends_with('$') {
                    return Err("cannot anchor both the start and the end".to_string());
                }
                if body.is_empty() || !body.chars().all(|c| c == '.') {
                    return Err("expected one or more '.' characters".to_string());
                }
                Ok(())
            }
            Self::Random => {
                if parameter.chars().all(|c| matches!(c, '#' | 'X' | 'x' | '*')) {
                    Ok(())
                } else {
                    Err("only '#', 'X', 'x' and '*' are allowed".to_string())
                }
            }
            Self::Sequential => {
                if parameter.chars().all(|c| c == '#') {
                    Ok(())
                } else {
                    Err("only '#' is allowed".to_string())
                }
            }
        }
    }

    /// Builds the unanchored regular expression describing valid values.
    pub fn shape_fragment(&self, parameter: &str) -> String {
        match self {
            Self::Literal => regex::escape(parameter),
            Self::CurrentDate => date_parts(parameter)
                .iter()
                .map(|part| match part {
                    DatePart::Field(field) => format!("[0-9]{{{}}}", field.width()),
                    DatePart::Text(text) => regex::escape(text),
                })
                .collect(),
            Self::Text | Self::OptionalText => text_mask_fragment(parameter),
            Self::OrgUnitCode => format!(".{{{}}}", org_unit_width(parameter)),
            Self::Random => parameter
                .chars()
                .map(|c| match c {
                    '#' => "[0-9]",
                    'X' => "[A-Z]",
                    'x' => "[a-z]",
                    _ => "[0-9A-Za-z]",
                })
                .collect(),
            Self::Sequential => format!("[0-9]{{{}}}", parameter.len()),
        }
    }

    /// Applies the method's format function to a supplied value.
    ///
    /// Returns `None` when the value cannot be formatted, e.g. an
    /// organisation unit code shorter than the requested width.
    pub fn format_value(&self, parameter: &str, value: &str) -> Option<String> {
        match self {
            Self::Literal => Some(parameter.to_string()),
            Self::CurrentDate | Self::Text | Self::OptionalText | Self::Random => {
                Some(value.to_string())
            }
            Self::OrgUnitCode => {
                let width = org_unit_width(parameter);
                let chars: Vec<char> = value.chars().collect();
                if chars.len() < width {
                    return None;
                }
                let taken = if parameter.ends_with('$') {
                    &chars[chars.len() - width..]
                } else {
                    &chars[..width]
                };
                Some(taken.iter().collect())
            }
            Self::Sequential => {
                let width = parameter.len();
                if value.is_empty()
                    || value.len() > width
                    || !value.chars().all(|c| c.is_ascii_digit())
                {
                    return None;
                }
                Some(format!("{value:0>width$}"))
            }
        }
    }
}

/// Renders a date format such as `yyyyMMdd` for the given instant.
pub fn render_date<Tz>(parameter: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let chrono_format: String = date_parts(parameter)
        .iter()
        .map(|part| match part {
            DatePart::Field(field) => field.chrono_spec().to_string(),
            DatePart::Text(text) => text.replace('%', "%%"),
        })
        .collect();
    now.format(&chrono_format).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateField {
    Year,
    ShortYear,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DateField {
    fn chrono_spec(&self) -> &'static str {
        match self {
            Self::Year => "%Y",
            Self::ShortYear => "%y",
            Self::Month => "%m",
            Self::Day => "%d",
            Self::Hour => "%H",
            Self::Minute => "%M",
            Self::Second => "%S",
        }
    }

    fn width(&self) -> usize {
        match self {
            Self::Year => 4,
            _ => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DatePart {
    Field(DateField),
    Text(String),
}

const DATE_TOKENS: [(&str, DateField); 7] = [
    ("yyyy", DateField::Year),
    ("yy", DateField::ShortYear),
    ("MM", DateField::Month),
    ("dd", DateField::Day),
    ("HH", DateField::Hour),
    ("mm", DateField::Minute),
    ("ss", DateField::Second),
];

fn date_parts(parameter: &str) -> Vec<DatePart> {
    let mut parts = Vec::new();
    let mut rest = parameter;
    let mut text = String::new();

    'scan: while !rest.is_empty() {
        for (token, field) in DATE_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                if !text.is_empty() {
                    parts.push(DatePart::Text(std::mem::take(&mut text)));
                }
                parts.push(DatePart::Field(field));
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            text.push(c);
        }
        rest = chars.as_str();
    }

    if !text.is_empty() {
        parts.push(DatePart::Text(text));
    }
    parts
}

fn text_mask_fragment(mask: &str) -> String {
    let mut fragment = String::new();
    let mut chars = mask.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            fragment.push_str(&regex::escape(&c.to_string()));
            continue;
        }
        match chars.next() {
            Some('d') => fragment.push_str("[0-9]"),
            Some('x') => fragment.push_str("[a-z]"),
            Some('X') => fragment.push_str("[A-Z]"),
            Some('w') => fragment.push_str("[0-9A-Za-z]"),
            Some(other) => fragment.push_str(&regex::escape(&other.to_string())),
            None => fragment.push_str(r"\\"),
        }
    }
    fragment
}

fn org_unit_width(parameter: &str) -> usize {
    parameter.chars().filter(|c| *c == '.').count()
}
