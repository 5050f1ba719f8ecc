//! Key paths for the settings store
//!
//! A key path is an ordered list of non-empty segments. Its canonical form is
//! the segments joined by [`SEPARATOR`]; canonical forms are what the
//! [`FlatStore`](crate::FlatStore) indexes.
//!
//! ## Parsing rules
//!
//! Parsing is relaxed to accept historical data:
//! - Whitespace around each segment is trimmed
//! - Empty segments (consecutive separators, leading or trailing separators)
//!   are discarded
//! - A path with no remaining segment is rejected with [`KeyError::Empty`]

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between path segments in a canonical key.
pub const SEPARATOR: char = '/';

/// A validated, normalized key path
///
/// Two key paths are equal iff their segment sequences are equal.
///
/// # Examples
///
/// ```
/// use strata_settings_core::KeyPath;
///
/// let path = KeyPath::parse(" net // timeout ").unwrap();
/// assert_eq!(path.segments(), ["net", "timeout"]);
/// assert_eq!(path.canonical(), "net/timeout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a key path from its string form
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        Self::from_segments(std::iter::once(key))
    }

    /// Build a key path from raw segments
    ///
    /// Every raw segment goes through the same normalization as [`KeyPath::parse`],
    /// so a raw segment containing the separator contributes several segments.
    pub fn from_segments<I, S>(raw: I) -> Result<Self, KeyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = Vec::new();
        for item in raw {
            segments.extend(split_segments(item.as_ref()).map(str::to_string));
        }

        if segments.is_empty() {
            return Err(KeyError::Empty);
        }

        Ok(KeyPath { segments })
    }

    /// Path segments, outermost first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (always at least one)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The last segment, used as the leaf name in a nested document
    pub fn leaf(&self) -> &str {
        // Construction guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Canonical string form: segments joined by [`SEPARATOR`]
    pub fn canonical(&self) -> String {
        let mut key = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i != 0 {
                key.push(SEPARATOR);
            }
            key.push_str(segment);
        }
        key
    }

    /// Append a child segment, returning the extended path
    pub fn child(&self, segment: &str) -> Result<Self, KeyError> {
        Self::from_segments(self.segments.iter().map(String::as_str).chain([segment]))
    }
}

/// Split a canonical key into its non-empty, trimmed segments
///
/// This is the splitting rule used both by [`KeyPath::parse`] and by the tree
/// exporter when it walks canonical keys.
pub fn split_segments(key: &str) -> impl Iterator<Item = &str> {
    key.split(SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for KeyPath {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPath::parse(s)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = KeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        KeyPath::parse(value)
    }
}

/// Key path validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// No non-empty segment remained after normalization
    #[error("key path has no non-empty segment")]
    Empty,
}
