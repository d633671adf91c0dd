//! Environment conditions attached to constraints.
//!
//! A [`Marker`] is the parsed form of everything after the `;` in a
//! constraint line. Evaluation is a pure function of the [`Environment`].

use std::fmt;

use depfilter_core::{Environment, VersionPattern};

/// Environment attribute a condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerVar {
    /// Interpreter `major.minor`.
    PythonVersion,
    /// Full interpreter version.
    PythonFullVersion,
    /// `Windows`, `Darwin`, `Linux`, ...
    PlatformSystem,
    /// `win32`, `darwin`, `linux`, ...
    SysPlatform,
    /// `nt` or `posix`.
    OsName,
    /// Machine architecture, if the environment supplies one.
    PlatformMachine,
}

impl MarkerVar {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "python_version" => Some(MarkerVar::PythonVersion),
            "python_full_version" => Some(MarkerVar::PythonFullVersion),
            "platform_system" => Some(MarkerVar::PlatformSystem),
            "sys_platform" => Some(MarkerVar::SysPlatform),
            "os_name" => Some(MarkerVar::OsName),
            "platform_machine" => Some(MarkerVar::PlatformMachine),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MarkerVar::PythonVersion => "python_version",
            MarkerVar::PythonFullVersion => "python_full_version",
            MarkerVar::PlatformSystem => "platform_system",
            MarkerVar::SysPlatform => "sys_platform",
            MarkerVar::OsName => "os_name",
            MarkerVar::PlatformMachine => "platform_machine",
        }
    }

    /// Returns true for variables compared as versions.
    pub fn is_version(&self) -> bool {
        matches!(self, MarkerVar::PythonVersion | MarkerVar::PythonFullVersion)
    }
}

/// Comparator used in a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompareOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::NotEq),
            "<" => Some(CompareOp::Lt),
            ">" => Some(CompareOp::Gt),
            "<=" => Some(CompareOp::Le),
            ">=" => Some(CompareOp::Ge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }

    /// Returns the operator with its operands swapped (`a < b` == `b > a`).
    pub fn flipped(&self) -> Self {
        match self {
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Le => CompareOp::Ge,
            CompareOp::Ge => CompareOp::Le,
            other => *other,
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, CompareOp::Eq | CompareOp::NotEq)
    }
}

/// Right-hand side of a comparison, typed by the variable it is compared to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerValue {
    Version(VersionPattern),
    Text(String),
}

impl fmt::Display for MarkerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerValue::Version(pattern) => write!(f, "'{}'", pattern),
            MarkerValue::Text(text) => write!(f, "'{}'", text),
        }
    }
}

/// A boolean condition over the environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Marker {
    Compare {
        var: MarkerVar,
        op: CompareOp,
        value: MarkerValue,
    },
    And(Vec<Marker>),
    Or(Vec<Marker>),
}

impl Marker {
    /// Evaluates the condition against `env`.
    ///
    /// # Examples
    ///
    /// ```
    /// use depfilter_core::Environment;
    /// use depfilter_rules::parse::parse_marker;
    ///
    /// let marker =
    ///     parse_marker("python_version == '3.10' and platform_system == 'Windows'").unwrap();
    /// assert!(marker.evaluate(&Environment::parse("3.10.11", "Windows").unwrap()));
    /// assert!(!marker.evaluate(&Environment::parse("3.9", "Windows").unwrap()));
    /// ```
    pub fn evaluate(&self, env: &Environment) -> bool {
        match self {
            Marker::Compare { var, op, value } => compare(env, *var, *op, value),
            Marker::And(terms) => terms.iter().all(|m| m.evaluate(env)),
            Marker::Or(terms) => terms.iter().any(|m| m.evaluate(env)),
        }
    }
}

fn compare(env: &Environment, var: MarkerVar, op: CompareOp, value: &MarkerValue) -> bool {
    match value {
        MarkerValue::Version(pattern) => {
            let actual = match var {
                MarkerVar::PythonFullVersion => env.python_full_version().clone(),
                _ => env.python_version(),
            };
            match (op, pattern) {
                (CompareOp::Eq, pattern) => pattern.matches(&actual),
                (CompareOp::NotEq, pattern) => !pattern.matches(&actual),
                (CompareOp::Lt, VersionPattern::Exact(bound)) => actual < *bound,
                (CompareOp::Gt, VersionPattern::Exact(bound)) => actual > *bound,
                (CompareOp::Le, VersionPattern::Exact(bound)) => actual <= *bound,
                (CompareOp::Ge, VersionPattern::Exact(bound)) => actual >= *bound,
                // Ordered wildcard comparisons are rejected by the parser.
                (_, VersionPattern::Prefix(_)) => false,
            }
        }
        MarkerValue::Text(expected) => {
            let actual = match var {
                MarkerVar::PlatformSystem => Some(env.platform().system_name().to_string()),
                MarkerVar::SysPlatform => Some(env.platform().sys_platform()),
                MarkerVar::OsName => Some(env.platform().os_name().to_string()),
                MarkerVar::PlatformMachine => env.machine().map(str::to_string),
                MarkerVar::PythonVersion | MarkerVar::PythonFullVersion => None,
            };
            let Some(actual) = actual else {
                return false;
            };
            match op {
                CompareOp::Eq => actual == *expected,
                CompareOp::NotEq => actual != *expected,
                // Ordered string comparisons are rejected by the parser.
                _ => false,
            }
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Compare { var, op, value } => {
                write!(f, "{} {} {}", var.name(), op.as_str(), value)
            }
            Marker::And(terms) => write_joined(f, terms, " and ", true),
            Marker::Or(terms) => write_joined(f, terms, " or ", false),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    terms: &[Marker],
    separator: &str,
    parenthesize_or: bool,
) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        if parenthesize_or && matches!(term, Marker::Or(_)) {
            write!(f, "({})", term)?;
        } else {
            write!(f, "{}", term)?;
        }
    }
    Ok(())
}
