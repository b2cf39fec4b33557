//! Absolute path handling for the remote hierarchy
//!
//! Drive addresses objects by opaque id; callers address them by absolute
//! `/`-delimited paths. `DrivePath` is the parsed form: an ordered list of
//! non-empty name segments. Parsing rejects non-absolute input before any
//! network access happens, and collapses empty segments from repeated or
//! trailing separators.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A validated absolute path in the remote hierarchy.
///
/// Zero segments denotes the root folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrivePath {
    segments: Vec<String>,
}

impl DrivePath {
    /// Parse an absolute path string.
    ///
    /// Fails with [`Error::InvalidPath`] if the input does not start with
    /// `/`. Empty segments (`//`, trailing `/`) are ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        if !raw.starts_with('/') {
            return Err(Error::InvalidPath(format!("'{raw}' is not absolute")));
        }

        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { segments })
    }

    /// The root path `/`
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Path segments in order, left to right
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Check whether this path denotes the root folder
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into (parent path, leaf name).
    ///
    /// Returns `None` for the root, which has no leaf.
    pub fn split_leaf(&self) -> Option<(DrivePath, &str)> {
        let (leaf, parent) = self.segments.split_last()?;
        Some((
            DrivePath {
                segments: parent.to_vec(),
            },
            leaf.as_str(),
        ))
    }
}

impl fmt::Display for DrivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl FromStr for DrivePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let path = DrivePath::parse("/a/b/c").unwrap();
        assert_eq!(path.segments(), ["a", "b", "c"]);
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert!(matches!(
            DrivePath::parse("a/b"),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(DrivePath::parse(""), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_empty_segments_collapsed() {
        let path = DrivePath::parse("//a///b/").unwrap();
        assert_eq!(path.segments(), ["a", "b"]);
    }

    #[test]
    fn test_root() {
        let path = DrivePath::parse("/").unwrap();
        assert!(path.is_root());
        assert_eq!(path, DrivePath::root());
        assert!(path.split_leaf().is_none());
    }

    #[test]
    fn test_split_leaf() {
        let path = DrivePath::parse("/docs/report.txt").unwrap();
        let (parent, leaf) = path.split_leaf().unwrap();
        assert_eq!(parent.segments(), ["docs"]);
        assert_eq!(leaf, "report.txt");

        let (grandparent, leaf) = parent.split_leaf().unwrap();
        assert!(grandparent.is_root());
        assert_eq!(leaf, "docs");
    }

    #[test]
    fn test_display_round_trip() {
        let path = DrivePath::parse("/a/b").unwrap();
        assert_eq!(path.to_string(), "/a/b");
        assert_eq!(DrivePath::root().to_string(), "/");
    }
}
