//! Candidate selection on top of a constraint set.

use tracing::{debug, info, warn};

use depfilter_config::{ConfigError, FilterConfig};
use depfilter_core::{Environment, Version};
use depfilter_rules::ConstraintSet;

/// Picks dependency versions, skipping every candidate the constraint set
/// excludes for the environment.
///
/// # Example
///
/// ```
/// use depfilter::prelude::*;
///
/// let resolver = Resolver::new(
///     ConstraintSet::builtin().unwrap(),
///     Environment::parse("3.10", "Windows").unwrap(),
/// );
/// let candidates: Vec<Version> = ["1.12.1", "1.13.1", "2.0.0", "2.0.1"]
///     .iter()
///     .map(|v| v.parse().unwrap())
///     .collect();
///
/// assert_eq!(resolver.select("torch", &candidates), None);
/// assert_eq!(
///     resolver.select("numpy", &candidates),
///     Some("2.0.1".parse().unwrap())
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Resolver {
    rules: ConstraintSet,
    env: Environment,
    allow_prereleases: bool,
}

impl Resolver {
    /// Creates a resolver that skips pre-releases.
    pub fn new(rules: ConstraintSet, env: Environment) -> Self {
        info!(
            event = "resolver_ready",
            environment = %env,
            constraint_count = rules.len(),
        );
        Self {
            rules,
            env,
            allow_prereleases: false,
        }
    }

    /// Builds a resolver from configuration: the built-in rules (unless
    /// disabled), every configured rule file, and the configured
    /// environment.
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigError> {
        let rules = load_rules(config)?;
        let env = config.environment()?;
        Ok(Self::new(rules, env).allow_prereleases(config.resolver.allow_prereleases))
    }

    /// Sets whether pre-releases and dev-releases may be selected.
    pub fn allow_prereleases(mut self, allow: bool) -> Self {
        self.allow_prereleases = allow;
        self
    }

    pub fn rules(&self) -> &ConstraintSet {
        &self.rules
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Returns true if `version` of `package` may be selected.
    pub fn accepts(&self, package: &str, version: &Version) -> bool {
        if version.is_prerelease() && !self.allow_prereleases {
            return false;
        }
        match self.rules.explain(package, version, &self.env).first() {
            Some(constraint) => {
                debug!(
                    event = "rejected",
                    package = package,
                    version = %version,
                    line = constraint.line(),
                );
                false
            }
            None => true,
        }
    }

    /// Returns the acceptable candidates, in input order.
    pub fn filter(&self, package: &str, candidates: &[Version]) -> Vec<Version> {
        candidates
            .iter()
            .filter(|v| self.accepts(package, v))
            .cloned()
            .collect()
    }

    /// Returns the highest acceptable candidate.
    pub fn select(&self, package: &str, candidates: &[Version]) -> Option<Version> {
        let selected = candidates
            .iter()
            .filter(|v| self.accepts(package, v))
            .max()
            .cloned();

        match &selected {
            Some(version) => info!(
                event = "selected",
                package = package,
                version = %version,
                candidates = candidates.len(),
            ),
            None => warn!(
                event = "no_candidate",
                package = package,
                candidates = candidates.len(),
            ),
        }
        selected
    }
}

/// Loads the constraint sources named by `config`, in order.
pub fn load_rules(config: &FilterConfig) -> Result<ConstraintSet, ConfigError> {
    let mut rules = if config.rules.include_builtin {
        ConstraintSet::builtin()?
    } else {
        ConstraintSet::new()
    };
    for path in &config.rules.files {
        rules.extend(ConstraintSet::from_file(path)?);
    }
    Ok(rules)
}
