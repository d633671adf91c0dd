//! Version specifiers (`!=1.12.*`, `>=2.0`, `~=1.4.2`).

use std::fmt;

use depfilter_core::{FilterError, Result, Version, VersionPattern};

/// Comparison operator of a version specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    /// `~=`: at least this version, within the same release series.
    Compatible,
}

impl Operator {
    /// Looks up an operator token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            "<" => Some(Operator::Less),
            ">" => Some(Operator::Greater),
            "<=" => Some(Operator::LessEqual),
            ">=" => Some(Operator::GreaterEqual),
            "~=" => Some(Operator::Compatible),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Compatible => "~=",
        }
    }

    /// Returns true if the operator accepts a `X.Y.*` operand.
    pub fn allows_wildcard(&self) -> bool {
        matches!(self, Operator::Equal | Operator::NotEqual)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `<operator><version>` clause.
///
/// # Examples
///
/// ```
/// use depfilter_core::Version;
/// use depfilter_rules::Specifier;
///
/// let spec = Specifier::parse("!=1.13.*").unwrap();
/// assert!(!spec.allows(&Version::parse("1.13.1").unwrap()));
/// assert!(spec.allows(&Version::parse("1.14.0").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Specifier {
    op: Operator,
    pattern: VersionPattern,
}

impl Specifier {
    /// Creates a specifier, checking that the operator accepts the pattern.
    pub fn new(op: Operator, pattern: VersionPattern) -> Result<Self> {
        if pattern.is_wildcard() && !op.allows_wildcard() {
            return Err(FilterError::malformed(
                0,
                format!("wildcard `{}` is not allowed with `{}`", pattern, op),
            ));
        }
        if op == Operator::Compatible {
            if let VersionPattern::Exact(version) = &pattern {
                if version.release().len() < 2 {
                    return Err(FilterError::malformed(
                        0,
                        format!("`~={}` needs at least two release segments", version),
                    ));
                }
            }
        }
        Ok(Self { op, pattern })
    }

    /// Parses a specifier such as `!=2.0.1` or `>= 1.4`.
    ///
    /// Errors carry line `0`; callers re-stamp them with
    /// [`FilterError::at_line`].
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let op_len = s
            .find(|c: char| !matches!(c, '=' | '!' | '<' | '>' | '~'))
            .unwrap_or(s.len());
        let (token, operand) = s.split_at(op_len);
        if token.is_empty() {
            return Err(FilterError::malformed(
                0,
                format!("expected an operator before `{}`", s),
            ));
        }
        let op = Operator::from_token(token)
            .ok_or_else(|| FilterError::unknown_operator(0, token))?;
        let operand = operand.trim();
        if operand.is_empty() {
            return Err(FilterError::malformed(
                0,
                format!("missing version after `{}`", token),
            ));
        }
        Self::new(op, VersionPattern::parse(operand)?)
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn pattern(&self) -> &VersionPattern {
        &self.pattern
    }

    /// Returns true if `version` satisfies this specifier.
    pub fn allows(&self, version: &Version) -> bool {
        let bound = match &self.pattern {
            VersionPattern::Exact(bound) => bound,
            VersionPattern::Prefix(_) => {
                return match self.op {
                    Operator::Equal => self.pattern.matches(version),
                    Operator::NotEqual => !self.pattern.matches(version),
                    // Rejected by `Specifier::new`.
                    _ => false,
                };
            }
        };
        match self.op {
            Operator::Equal => version == bound,
            Operator::NotEqual => version != bound,
            Operator::Less => version < bound,
            Operator::Greater => version > bound,
            Operator::LessEqual => version <= bound,
            Operator::GreaterEqual => version >= bound,
            Operator::Compatible => {
                let segments = bound.release();
                let series = &segments[..segments.len().saturating_sub(1)];
                version >= bound && version.has_prefix(series)
            }
        }
    }

    /// Returns true if no version of the `series` satisfies this specifier.
    ///
    /// A `X.Y.*` series is the half-open range from `X.Y.dev0` up to the
    /// next series, so ordered operators compare their bound against the
    /// ends of that range.
    pub fn rejects_series(&self, series: &VersionPattern) -> bool {
        let prefix = match (self.op, series) {
            (_, VersionPattern::Exact(version)) => return !self.allows(version),
            (Operator::NotEqual, _) => return self.pattern.covers(series),
            (Operator::Equal, _) => return !self.pattern.overlaps(series),
            (_, VersionPattern::Prefix(prefix)) => prefix,
        };
        let bound = match &self.pattern {
            VersionPattern::Exact(bound) => bound,
            // Rejected by `Specifier::new`.
            VersionPattern::Prefix(_) => return false,
        };

        let (lower, upper) = Version::series_bounds(prefix);
        let at_or_past_upper = |v: &Version| upper.as_ref().is_some_and(|u| v >= u);
        match self.op {
            Operator::Less => lower >= *bound,
            Operator::LessEqual => lower > *bound,
            Operator::Greater | Operator::GreaterEqual => at_or_past_upper(bound),
            Operator::Compatible => {
                let segments = bound.release();
                let (_, compatible_upper) =
                    Version::series_bounds(&segments[..segments.len().saturating_sub(1)]);
                at_or_past_upper(bound)
                    || compatible_upper.is_some_and(|u| lower >= u)
            }
            Operator::Equal | Operator::NotEqual => false,
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.pattern)
    }
}
