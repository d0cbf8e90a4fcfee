use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// A dotted binding path such as `player.inventory.0.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindPath {
    /// Path segments, never empty.
    segments: Vec<String>,
}

impl BindPath {
    /// Parse a dotted path. Empty paths and empty segments are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let segments: Vec<String> = s.split('.').map(str::to_string).collect();
        if segments.iter().any(|seg| seg.is_empty() || seg == "()") {
            return Err(Error::InvalidPath(s.to_string()));
        }
        Ok(Self { segments })
    }

    /// The segments of the path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a path has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first segment.
    pub fn head(&self) -> &str {
        &self.segments[0]
    }

    /// The path made of the first `n` segments.
    pub fn prefix(&self, n: usize) -> Self {
        Self {
            segments: self.segments[..n.clamp(1, self.len())].to_vec(),
        }
    }

    /// True if `other` is a leading run of this path's segments.
    pub fn starts_with(&self, other: &Self) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// Append segments to this path.
    pub fn join(&self, rest: &[String]) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(rest.iter().cloned());
        Self { segments }
    }

    /// Replace the leading `prefix` of this path with `with`. Returns `None` if
    /// this path does not start with `prefix`.
    pub fn rebase(&self, prefix: &Self, with: &Self) -> Option<Self> {
        self.starts_with(prefix)
            .then(|| with.join(&self.segments[prefix.len()..]))
    }

    /// The canonical dotted form, used as a binding-map key.
    pub fn key(&self) -> String {
        self.segments.join(".")
    }
}

/// If the segment is a function call (`name()`), return the function name.
pub(crate) fn call_name(segment: &str) -> Option<&str> {
    segment.strip_suffix("()")
}

impl FromStr for BindPath {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for BindPath {
    type Error = Error;
    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BindPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
