//! Version types for representing package and interpreter releases
//!
//! Versions are ordered by their numeric release segments first
//! (trailing zeros ignored, so `3.10 == 3.10.0`), then by
//! `dev < pre-release < final < post-release`.

mod pattern;


use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{FilterError, Result};

pub use pattern::VersionPattern;

/// Pre-release phase of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    /// Alpha (`a1`, `alpha1`).
    Alpha(u64),
    /// Beta (`b1`, `beta1`).
    Beta(u64),
    /// Release candidate (`rc1`, `c1`, `pre1`, `preview1`).
    Candidate(u64),
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreRelease::Alpha(n) => write!(f, "a{}", n),
            PreRelease::Beta(n) => write!(f, "b{}", n),
            PreRelease::Candidate(n) => write!(f, "rc{}", n),
        }
    }
}

/// A concrete package or interpreter version.
///
/// # Examples
///
/// ```
/// use depfilter_core::Version;
///
/// let v: Version = "2.0.0rc1".parse().unwrap();
/// assert!(v.is_prerelease());
/// assert!(v < "2.0.0".parse().unwrap());
///
/// let py = Version::parse("3.10").unwrap();
/// assert_eq!(py, Version::parse("3.10.0").unwrap());
/// ```
#[derive(Clone)]
pub struct Version {
    release: Vec<u64>,
    pre: Option<PreRelease>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

// Sort key for the phase between release segments and post-release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Phase {
    // `1.0.dev1` sorts before every pre-release of 1.0
    DevOnly,
    Pre(PreRelease),
    Final,
}

impl Version {
    /// Creates a final release from its numeric segments.
    pub fn from_release(release: impl Into<Vec<u64>>) -> Self {
        Self {
            release: release.into(),
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    /// Parses a version string such as `1.12.5`, `2.0.0rc1`,
    /// `1.0.post2.dev3` or `v1.4+cpu`.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        let lowered = raw.to_ascii_lowercase();
        let body = lowered.strip_prefix('v').unwrap_or(&lowered);

        let (body, local) = match body.split_once('+') {
            Some((_, "")) => return Err(FilterError::InvalidVersion(raw.to_string())),
            Some((b, l)) => (b, Some(l.to_string())),
            None => (body, None),
        };

        let mut cursor = Cursor::new(body);
        let release = cursor
            .release()
            .ok_or_else(|| FilterError::InvalidVersion(raw.to_string()))?;
        let pre = cursor.pre_release();
        let post = cursor.post_release();
        let dev = cursor.dev_release();

        if !cursor.is_done() {
            return Err(FilterError::InvalidVersion(raw.to_string()));
        }

        Ok(Self {
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Returns the numeric release segments.
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Returns the pre-release phase, if any.
    pub fn pre(&self) -> Option<PreRelease> {
        self.pre
    }

    /// Returns the post-release number, if any.
    pub fn post(&self) -> Option<u64> {
        self.post
    }

    /// Returns the dev-release number, if any.
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// Returns the local version label, if any.
    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    /// Returns true for pre-releases and dev-releases.
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Returns the release segment at `index`, treating missing segments as zero.
    pub fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Returns true if the release segments start with `prefix`.
    ///
    /// Missing segments count as zero, so `1.12` starts with `[1, 12, 0]`.
    pub fn has_prefix(&self, prefix: &[u64]) -> bool {
        prefix
            .iter()
            .enumerate()
            .all(|(i, segment)| self.segment(i) == *segment)
    }

    /// Returns the first `n` release segments as a final release.
    ///
    /// ```
    /// use depfilter_core::Version;
    ///
    /// let full = Version::parse("3.10.4").unwrap();
    /// assert_eq!(full.truncated(2).to_string(), "3.10");
    /// ```
    pub fn truncated(&self, n: usize) -> Version {
        Version::from_release((0..n).map(|i| self.segment(i)).collect::<Vec<_>>())
    }

    /// Returns the half-open range `[lower, upper)` holding every version
    /// whose release starts with `prefix`.
    ///
    /// `upper` is `None` when the range is unbounded (an empty prefix).
    ///
    /// ```
    /// use depfilter_core::Version;
    ///
    /// let (lower, upper) = Version::series_bounds(&[1, 13]);
    /// assert_eq!(lower.to_string(), "1.13.dev0");
    /// assert_eq!(upper.unwrap().to_string(), "1.14.dev0");
    /// ```
    pub fn series_bounds(prefix: &[u64]) -> (Version, Option<Version>) {
        let lower = Version {
            dev: Some(0),
            ..Version::from_release(prefix)
        };
        let upper = prefix.split_last().and_then(|(last, head)| {
            let next = last.checked_add(1)?;
            let mut release = head.to_vec();
            release.push(next);
            Some(Version {
                dev: Some(0),
                ..Version::from_release(release)
            })
        });
        (lower, upper)
    }

    fn trimmed_release(&self) -> &[u64] {
        let end = self
            .release
            .iter()
            .rposition(|s| *s != 0)
            .map_or(0, |i| i + 1);
        &self.release[..end]
    }

    fn phase(&self) -> Phase {
        match (self.pre, self.post, self.dev) {
            (Some(pre), _, _) => Phase::Pre(pre),
            (None, None, Some(_)) => Phase::DevOnly,
            _ => Phase::Final,
        }
    }

    // (false, n) for a dev release sorts before (true, 0) for none
    fn dev_key(&self) -> (bool, u64) {
        (self.dev.is_none(), self.dev.unwrap_or(0))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.trimmed_release()
            .cmp(other.trimmed_release())
            .then_with(|| self.phase().cmp(&other.phase()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.trimmed_release().hash(state);
        self.phase().hash(state);
        self.post.hash(state);
        self.dev_key().hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", release.join("."))?;
        if let Some(pre) = self.pre {
            write!(f, "{}", pre)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self)
    }
}

impl FromStr for Version {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Normalizes a package name for comparison.
///
/// Names are case-insensitive and treat runs of `-`, `_` and `.` as a
/// single separator.
///
/// ```
/// use depfilter_core::normalize_package_name;
///
/// assert_eq!(normalize_package_name("Onnx_Runtime"), "onnx-runtime");
/// assert_eq!(normalize_package_name("zope.interface"), "zope-interface");
/// ```
pub fn normalize_package_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | '.') {
            pending_separator = true;
            continue;
        }
        if pending_separator && !normalized.is_empty() {
            normalized.push('-');
        }
        pending_separator = false;
        normalized.push(ch.to_ascii_lowercase());
    }
    normalized
}

// Byte cursor over the lowercased version body (local label removed).
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn is_done(&self) -> bool {
        self.rest.is_empty()
    }

    fn number(&mut self) -> Option<u64> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let value = self.rest[..end].parse().ok()?;
        self.rest = &self.rest[end..];
        Some(value)
    }

    fn release(&mut self) -> Option<Vec<u64>> {
        let mut segments = vec![self.number()?];
        while let Some(after_dot) = self.rest.strip_prefix('.') {
            if !after_dot.starts_with(|c: char| c.is_ascii_digit()) {
                break;
            }
            self.rest = after_dot;
            segments.push(self.number()?);
        }
        Some(segments)
    }

    // Consumes an optional `.`, `-` or `_` followed by one of `tags`.
    fn tag(&mut self, tags: &[&'static str]) -> Option<&'static str> {
        let trimmed = self.rest.trim_start_matches(['.', '-', '_']);
        if trimmed.len() + 1 < self.rest.len() {
            return None;
        }
        // Longest tag first so `preview` wins over `pre`.
        let tag = tags
            .iter()
            .copied()
            .filter(|t| trimmed.starts_with(*t))
            .max_by_key(|t| t.len())?;
        self.rest = &trimmed[tag.len()..];
        Some(tag)
    }

    fn tag_number(&mut self) -> u64 {
        let before = self.rest;
        self.rest = self.rest.trim_start_matches(['.', '-', '_']);
        if self.rest.len() + 1 < before.len() {
            self.rest = before;
            return 0;
        }
        match self.number() {
            Some(n) => n,
            None => {
                self.rest = before;
                0
            }
        }
    }

    fn pre_release(&mut self) -> Option<PreRelease> {
        let tag = self.tag(&["a", "alpha", "b", "beta", "rc", "c", "pre", "preview"])?;
        let n = self.tag_number();
        Some(match tag {
            "a" | "alpha" => PreRelease::Alpha(n),
            "b" | "beta" => PreRelease::Beta(n),
            _ => PreRelease::Candidate(n),
        })
    }

    fn post_release(&mut self) -> Option<u64> {
        if self.tag(&["post", "rev", "r"]).is_some() {
            return Some(self.tag_number());
        }
        // Implicit post-release: `1.0-1`
        let after_dash = self.rest.strip_prefix('-')?;
        if after_dash.starts_with(|c: char| c.is_ascii_digit()) {
            self.rest = after_dash;
            return self.number();
        }
        None
    }

    fn dev_release(&mut self) -> Option<u64> {
        self.tag(&["dev"])?;
        Some(self.tag_number())
    }
}
