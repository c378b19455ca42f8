use crate::error::PathError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered, non-empty sequence of route segments, e.g. `/TimeDV/radar`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NavPath {
    segments: Vec<String>,
}

impl NavPath {
    pub fn new<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(bad) = segments.iter().find(|s| !is_clean_segment(s)) {
            return Err(PathError::InvalidSegment(bad.clone()));
        }
        Ok(Self { segments })
    }

    /// For segment lists already known to be non-empty (e.g. walked from the tree).
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        debug_assert!(!segments.is_empty());
        Self { segments }
    }

    /// Parses `/a/b`, `a/b` or `a/b/`; empty segments are skipped.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        Self::new(raw.split('/').map(str::trim))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

}

/// A segment carries no `/` and no surrounding whitespace, so it survives a
/// display/parse round trip unchanged.
fn is_clean_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/') && segment == segment.trim()
}

impl fmt::Display for NavPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.segments {
            write!(f, "/{}", s)?;
        }
        Ok(())
    }
}

impl FromStr for NavPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NavPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for NavPath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<NavPath> for String {
    fn from(path: NavPath) -> Self {
        path.to_string()
    }
}
