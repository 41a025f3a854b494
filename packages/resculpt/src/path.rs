//! Rule path grammar.
//!
//! ```text
//! path    := segment ("." segment)*
//! segment := field | "*" | "[*]" | "[" digits "]"
//! field   := any characters except "." "[" "]"
//! ```
//!
//! `*` matches any single object key and never an array element; `[*]`
//! matches any array element and never an object key; `[n]` matches the
//! element at 0-based index `n`. Matching is strict segment-by-segment from
//! the document root (the matcher adds suffix matching on top of this
//! grammar, see [`crate::PathMatcher`]).

use std::fmt;

use crate::error::PathError;

/// One step of a rule path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches the object key equal to the literal name.
    Field(String),
    /// Matches any single object key (`*`).
    Wildcard,
    /// Matches any array element (`[*]`).
    ArrayAny,
    /// Matches the array element at this 0-based index (`[n]`).
    ArrayIndex(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::Wildcard => f.write_str("*"),
            Segment::ArrayAny => f.write_str("[*]"),
            Segment::ArrayIndex(n) => write!(f, "[{n}]"),
        }
    }
}

/// Parse a rule path string into its ordered segments.
///
/// # Errors
///
/// [`PathError::EmptySegment`] for an empty path, a leading, doubled, or
/// trailing `.`; [`PathError::InvalidArrayIndex`] for bracket selectors that
/// are neither `[*]` nor base-10 digits, and for unbalanced brackets.
pub fn parse_path(path: &str) -> Result<Vec<Segment>, PathError> {
    let parts = split_segments(path)?;
    let mut segments = Vec::with_capacity(parts.len());
    for part in parts {
        segments.push(parse_segment(part)?);
    }
    Ok(segments)
}

/// Split on `.` while protecting bracket selectors, so `a.[*].b` yields
/// `a`, `[*]`, `b`. A bracket also closes the running field, which keeps
/// the `items[0]` spelling equivalent to `items.[0]`.
fn split_segments(path: &str) -> Result<Vec<&str>, PathError> {
    if path.is_empty() {
        return Err(PathError::EmptySegment);
    }

    let bytes = path.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut in_bracket = false;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'[' if !in_bracket => {
                if i > start {
                    parts.push(&path[start..i]);
                }
                in_bracket = true;
                start = i;
            }
            b']' if in_bracket => {
                in_bracket = false;
                parts.push(&path[start..=i]);
                // a separating dot after the bracket belongs to the grammar,
                // not to the next segment
                if i + 1 < bytes.len() && bytes[i + 1] == b'.' {
                    i += 1;
                    if i + 1 >= bytes.len() {
                        return Err(PathError::EmptySegment);
                    }
                }
                start = i + 1;
            }
            b']' => {
                return Err(PathError::InvalidArrayIndex(path[start..=i].to_string()));
            }
            b'.' if !in_bracket => {
                if i == start {
                    return Err(PathError::EmptySegment);
                }
                parts.push(&path[start..i]);
                if i + 1 >= bytes.len() {
                    return Err(PathError::EmptySegment);
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if in_bracket {
        return Err(PathError::InvalidArrayIndex(path[start..].to_string()));
    }
    if start < bytes.len() {
        parts.push(&path[start..]);
    }
    Ok(parts)
}

fn parse_segment(part: &str) -> Result<Segment, PathError> {
    if part.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if part == "*" {
        return Ok(Segment::Wildcard);
    }
    if let Some(inner) = part
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        if inner == "*" {
            return Ok(Segment::ArrayAny);
        }
        if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathError::InvalidArrayIndex(inner.to_string()));
        }
        let index = inner
            .parse::<usize>()
            .map_err(|_| PathError::InvalidArrayIndex(inner.to_string()))?;
        return Ok(Segment::ArrayIndex(index));
    }
    Ok(Segment::Field(part.to_string()))
}
