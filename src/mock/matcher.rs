//! Mock route matching logic.
//!
//! # Responsibilities
//! - Match request paths against mock route patterns
//! - Capture `:param` segment values
//!
//! # Design Decisions
//! - Segment-wise matching: exact literals, `:param` captures, and a
//!   trailing `*` that swallows the rest of the path
//! - Matching is case-sensitive and never looks at the query string
//! - No regex to guarantee O(n) matching over the segments

use std::fmt;

/// One pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// Compiled mock route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern such as `/api/users/:id` or `/assets/*`.
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                if segment == "*" {
                    Segment::Wildcard
                } else if let Some(name) = segment.strip_prefix(':') {
                    Segment::Param(name.to_string())
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// Match `path` against this pattern, returning captured params on a hit.
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let path = path.split('?').next().unwrap_or(path);
        let mut parts = path.split('/').filter(|s| !s.is_empty());
        let mut params = Vec::new();

        for segment in &self.segments {
            match segment {
                // A trailing wildcard matches everything left, empty included.
                Segment::Wildcard => return Some(params),
                Segment::Literal(expected) => {
                    if parts.next() != Some(expected.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.next()?;
                    params.push((name.clone(), value.to_string()));
                }
            }
        }

        // No leftover path segments allowed without a wildcard.
        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// The pattern as written in the mock file.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
