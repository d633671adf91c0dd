//! Error types for depfilter

use thiserror::Error;

/// Main error type for constraint loading and evaluation.
///
/// Line numbers are 1-based. A line of `0` means the error was raised
/// outside of any constraint file (for example while parsing a candidate
/// version passed on the command line).
#[derive(Debug, Error)]
pub enum FilterError {
    /// A line could not be split into package, specifiers and condition.
    #[error("Malformed constraint on line {line}: {message}")]
    MalformedConstraint { line: usize, message: String },

    /// A comparator outside the supported set was used.
    #[error("Unknown operator `{operator}` on line {line}")]
    UnknownOperator { line: usize, operator: String },

    /// A version or version pattern could not be parsed.
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    /// Reading a constraint file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Creates a `MalformedConstraint` error.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        FilterError::MalformedConstraint {
            line,
            message: message.into(),
        }
    }

    /// Creates an `UnknownOperator` error.
    pub fn unknown_operator(line: usize, operator: impl Into<String>) -> Self {
        FilterError::UnknownOperator {
            line,
            operator: operator.into(),
        }
    }

    /// Re-stamps the error with the line it was found on.
    ///
    /// Version errors raised while parsing a constraint line become
    /// `MalformedConstraint`, since the line as a whole is unusable.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            FilterError::MalformedConstraint { message, .. } => {
                FilterError::MalformedConstraint { line, message }
            }
            FilterError::UnknownOperator { operator, .. } => {
                FilterError::UnknownOperator { line, operator }
            }
            FilterError::InvalidVersion(message) => FilterError::MalformedConstraint {
                line,
                message: format!("invalid version: {message}"),
            },
            other => other,
        }
    }

    /// Returns the line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            FilterError::MalformedConstraint { line, .. }
            | FilterError::UnknownOperator { line, .. } => Some(*line).filter(|l| *l > 0),
            _ => None,
        }
    }
}

/// Result type alias for depfilter operations
pub type Result<T> = std::result::Result<T, FilterError>;
