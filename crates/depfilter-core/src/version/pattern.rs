//! Exact and wildcard version patterns

use std::fmt;
use std::str::FromStr;

use super::Version;
use crate::error::{FilterError, Result};

/// A version token that is either an exact version or a `X.Y.*` prefix.
///
/// # Examples
///
/// ```
/// use depfilter_core::{Version, VersionPattern};
///
/// let series = VersionPattern::parse("1.12.*").unwrap();
/// assert!(series.matches(&Version::parse("1.12.5").unwrap()));
/// assert!(!series.matches(&Version::parse("1.13.0").unwrap()));
///
/// let exact = VersionPattern::parse("1.14.0").unwrap();
/// assert!(exact.matches(&Version::parse("1.14").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionPattern {
    /// A single version.
    Exact(Version),
    /// Every version whose release starts with these segments.
    Prefix(Vec<u64>),
}

impl VersionPattern {
    /// Parses an exact version or a pattern ending in `.*`.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        match raw.strip_suffix(".*") {
            Some(prefix) => {
                let segments = prefix
                    .split('.')
                    .map(|segment| segment.parse::<u64>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|_| FilterError::InvalidVersion(raw.to_string()))?;
                Ok(VersionPattern::Prefix(segments))
            }
            None if raw.contains('*') => Err(FilterError::InvalidVersion(raw.to_string())),
            None => Ok(VersionPattern::Exact(Version::parse(raw)?)),
        }
    }

    /// Returns true if this is a wildcard pattern.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, VersionPattern::Prefix(_))
    }

    /// Returns true if `version` is selected by this pattern.
    ///
    /// Prefix matching compares release segments only, so `1.13.*`
    /// also selects `1.13.0rc1` and `1.13.2.post1`.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionPattern::Exact(exact) => exact == version,
            VersionPattern::Prefix(prefix) => version.has_prefix(prefix),
        }
    }

    /// Returns true if every version selected by `other` is also selected
    /// by `self`.
    pub fn covers(&self, other: &VersionPattern) -> bool {
        match (self, other) {
            (_, VersionPattern::Exact(version)) => self.matches(version),
            (VersionPattern::Prefix(outer), VersionPattern::Prefix(inner)) => {
                inner.len() >= outer.len() && inner[..outer.len()] == outer[..]
            }
            (VersionPattern::Exact(_), VersionPattern::Prefix(_)) => false,
        }
    }

    /// Returns true if at least one version is selected by both patterns.
    pub fn overlaps(&self, other: &VersionPattern) -> bool {
        match (self, other) {
            (VersionPattern::Exact(a), VersionPattern::Exact(b)) => a == b,
            (VersionPattern::Exact(v), prefix) | (prefix, VersionPattern::Exact(v)) => {
                prefix.matches(v)
            }
            (VersionPattern::Prefix(a), VersionPattern::Prefix(b)) => {
                let shared = a.len().min(b.len());
                a[..shared] == b[..shared]
            }
        }
    }
}

impl fmt::Display for VersionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPattern::Exact(version) => write!(f, "{}", version),
            VersionPattern::Prefix(segments) => {
                let segments: Vec<String> = segments.iter().map(u64::to_string).collect();
                write!(f, "{}.*", segments.join("."))
            }
        }
    }
}

impl FromStr for VersionPattern {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        VersionPattern::parse(s)
    }
}

impl From<Version> for VersionPattern {
    fn from(version: Version) -> Self {
        VersionPattern::Exact(version)
    }
}
