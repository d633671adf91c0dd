//! Evaluation stage: a parsed constraint and its exclusion rules.

use std::fmt;

use smallvec::SmallVec;

use depfilter_core::{normalize_package_name, Environment, Version, VersionPattern};

use crate::marker::Marker;
use crate::specifier::{Operator, Specifier};

/// A rule excluding versions of one package under an environment condition.
///
/// The specifiers list what stays *allowed*; a candidate is excluded when
/// the condition holds and the candidate fails any specifier.
///
/// # Examples
///
/// ```
/// use depfilter_core::{Environment, Version};
/// use depfilter_rules::parse::parse_line;
///
/// let rule = parse_line("ipython != 8.13.0; python_version < '3.9'", 1)
///     .unwrap()
///     .unwrap();
/// let candidate = Version::parse("8.13.0").unwrap();
///
/// assert!(rule.excludes(&candidate, &Environment::parse("3.8", "Linux").unwrap()));
/// assert!(!rule.excludes(&candidate, &Environment::parse("3.9", "Linux").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    name: String,
    package: String,
    extras: Vec<String>,
    specifiers: SmallVec<[Specifier; 4]>,
    condition: Option<Marker>,
    rationale: Option<String>,
    line: usize,
}

impl Constraint {
    /// Creates a constraint. `name` is kept as written and normalized for
    /// lookups.
    pub fn new(
        name: impl Into<String>,
        extras: Vec<String>,
        specifiers: SmallVec<[Specifier; 4]>,
        condition: Option<Marker>,
        line: usize,
    ) -> Self {
        let name = name.into();
        Self {
            package: normalize_package_name(&name),
            name,
            extras,
            specifiers,
            condition,
            rationale: None,
            line,
        }
    }

    /// Attaches a free-text rationale.
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Returns the normalized package name.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Returns the package name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn specifiers(&self) -> &[Specifier] {
        &self.specifiers
    }

    pub fn condition(&self) -> Option<&Marker> {
        self.condition.as_ref()
    }

    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    /// Returns the 1-based line the constraint was read from.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the version patterns named by `!=` clauses.
    pub fn excluded_versions(&self) -> impl Iterator<Item = &VersionPattern> {
        self.specifiers
            .iter()
            .filter(|s| s.op() == Operator::NotEqual)
            .map(Specifier::pattern)
    }

    /// Returns true if the constraint has no condition or its condition
    /// holds in `env`.
    pub fn applies_to(&self, env: &Environment) -> bool {
        self.condition.as_ref().map_or(true, |m| m.evaluate(env))
    }

    /// Returns the first specifier `version` fails, ignoring the condition.
    pub fn rejecting_specifier(&self, version: &Version) -> Option<&Specifier> {
        self.specifiers.iter().find(|s| !s.allows(version))
    }

    /// Returns true if `version` is excluded in `env`.
    pub fn excludes(&self, version: &Version, env: &Environment) -> bool {
        self.rejecting_specifier(version).is_some() && self.applies_to(env)
    }

    /// Returns true if one specifier rejects every version of `series` and
    /// the condition holds in `env`.
    ///
    /// An exact pattern is treated like a single candidate.
    pub fn excludes_series(&self, series: &VersionPattern, env: &Environment) -> bool {
        let rejected = match series {
            VersionPattern::Exact(version) => self.rejecting_specifier(version).is_some(),
            VersionPattern::Prefix(_) => self.specifiers.iter().any(|s| s.rejects_series(series)),
        };
        rejected && self.applies_to(env)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        let specifiers: Vec<String> = self.specifiers.iter().map(|s| s.to_string()).collect();
        write!(f, " {}", specifiers.join(", "))?;
        if let Some(condition) = &self.condition {
            write!(f, "; {}", condition)?;
        }
        Ok(())
    }
}
