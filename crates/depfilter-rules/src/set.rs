//! Immutable, package-indexed collection of constraints.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, trace};

use depfilter_core::{normalize_package_name, Environment, Result, Version, VersionPattern};

use crate::constraint::Constraint;
use crate::parse::{entries, parse_line, Entry};

/// The known-broken transitive dependency list shipped with the crate.
pub const BUILTIN_RULES: &str = include_str!("../broken_trans_deps.txt");

/// A set of constraints, queried per package.
///
/// # Examples
///
/// ```
/// use depfilter_core::Environment;
/// use depfilter_rules::ConstraintSet;
///
/// let rules = ConstraintSet::builtin().unwrap();
/// let windows_310 = Environment::parse("3.10", "Windows").unwrap();
///
/// assert!(rules.is_excluded("torch", "1.12.5", &windows_310).unwrap());
/// assert!(!rules.is_excluded("torch", "2.1.0", &windows_310).unwrap());
/// assert!(!rules.is_excluded("numpy", "1.24.0", &windows_310).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    by_package: HashMap<String, Vec<usize>>,
}

impl ConstraintSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses constraint text, one constraint per logical line.
    ///
    /// Comment lines directly above a constraint become its rationale.
    /// The first malformed line aborts parsing.
    pub fn parse(text: &str) -> Result<Self> {
        let mut set = Self::new();
        let mut rationale: Vec<String> = Vec::new();

        for entry in entries(text) {
            match entry {
                Entry::Blank => rationale.clear(),
                Entry::Comment(comment) => rationale.push(comment),
                Entry::Line { number, text } => {
                    if let Some(mut constraint) = parse_line(&text, number)? {
                        if !rationale.is_empty() {
                            constraint = constraint.with_rationale(rationale.join("\n"));
                        }
                        set.push(constraint);
                    }
                    rationale.clear();
                }
            }
        }

        debug!(event = "constraints_parsed", count = set.len());
        Ok(set)
    }

    /// Reads and parses a constraint file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let set = Self::parse(&contents)?;
        info!(
            event = "constraints_loaded",
            path = %path.display(),
            count = set.len(),
        );
        Ok(set)
    }

    /// Parses [`BUILTIN_RULES`].
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_RULES)
    }

    /// Adds a constraint.
    pub fn push(&mut self, constraint: Constraint) {
        self.by_package
            .entry(constraint.package().to_string())
            .or_default()
            .push(self.constraints.len());
        self.constraints.push(constraint);
    }

    /// Appends every constraint of `other`.
    pub fn extend(&mut self, other: ConstraintSet) {
        for constraint in other.constraints {
            self.push(constraint);
        }
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterates over all constraints in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Iterates over the constraints for `package` (any spelling).
    pub fn constraints_for<'a>(&'a self, package: &str) -> impl Iterator<Item = &'a Constraint> {
        self.by_package
            .get(&normalize_package_name(package))
            .into_iter()
            .flatten()
            .map(move |&index| &self.constraints[index])
    }

    /// Returns true if `version` of `package` is excluded in `env`.
    ///
    /// `version` may be an exact version or a `X.Y.*` series. A series is
    /// excluded when one specifier of an applicable constraint rejects
    /// every version in it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVersion` if `version` does not parse.
    pub fn is_excluded(&self, package: &str, version: &str, env: &Environment) -> Result<bool> {
        Ok(match VersionPattern::parse(version)? {
            VersionPattern::Exact(version) => self.is_version_excluded(package, &version, env),
            series => self.is_series_excluded(package, &series, env),
        })
    }

    /// Typed form of [`is_excluded`](Self::is_excluded) for a concrete version.
    pub fn is_version_excluded(&self, package: &str, version: &Version, env: &Environment) -> bool {
        let excluding = self
            .constraints_for(package)
            .find(|c| c.excludes(version, env));
        if let Some(constraint) = excluding {
            trace!(
                event = "excluded",
                package = constraint.package(),
                version = %version,
                line = constraint.line(),
            );
        }
        excluding.is_some()
    }

    /// Returns true if every version in `series` is excluded in `env`.
    pub fn is_series_excluded(
        &self,
        package: &str,
        series: &VersionPattern,
        env: &Environment,
    ) -> bool {
        self.constraints_for(package)
            .any(|c| c.excludes_series(series, env))
    }

    /// Returns every constraint that excludes `version` in `env`.
    pub fn explain<'a>(
        &'a self,
        package: &str,
        version: &Version,
        env: &Environment,
    ) -> Vec<&'a Constraint> {
        self.constraints_for(package)
            .filter(|c| c.excludes(version, env))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ConstraintSet {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}
