//! Parsing stage: constraint text to [`Constraint`] values.
//!
//! Nothing in this module looks at an [`Environment`](depfilter_core::Environment);
//! evaluation lives in [`crate::constraint`] and [`crate::marker`].
//!
//! Line format:
//!
//! ```text
//! <package>[extras] <op><version>[, <op><version>]*[; <condition>]
//! ```

mod lines;
mod marker;


use smallvec::SmallVec;

use depfilter_core::{FilterError, Result};

use crate::constraint::Constraint;
use crate::specifier::Specifier;

pub use lines::{entries, strip_inline_comment, Entry};
pub use marker::parse_marker;

/// Parses a single logical line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Examples
///
/// ```
/// use depfilter_rules::parse::parse_line;
///
/// let c = parse_line("onnxruntime != 1.14.0; platform_system == 'Darwin'", 7)
///     .unwrap()
///     .unwrap();
/// assert_eq!(c.package(), "onnxruntime");
/// assert_eq!(c.line(), 7);
/// assert!(c.condition().is_some());
///
/// assert!(parse_line("# comment", 1).unwrap().is_none());
/// ```
pub fn parse_line(text: &str, line: usize) -> Result<Option<Constraint>> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let body = strip_inline_comment(trimmed);
    let (requirement, condition) = match body.split_once(';') {
        Some((requirement, condition)) => {
            let condition = condition.trim();
            if condition.is_empty() {
                return Err(FilterError::malformed(
                    line,
                    "dangling `;` without a condition",
                ));
            }
            let marker = parse_marker(condition).map_err(|e| e.at_line(line))?;
            (requirement, Some(marker))
        }
        None => (body, None),
    };

    let requirement = parse_requirement(requirement).map_err(|e| e.at_line(line))?;
    Ok(Some(Constraint::new(
        requirement.name,
        requirement.extras,
        requirement.specifiers,
        condition,
        line,
    )))
}

struct Requirement {
    name: String,
    extras: Vec<String>,
    specifiers: SmallVec<[Specifier; 4]>,
}

fn parse_requirement(s: &str) -> Result<Requirement> {
    let s = s.trim();
    let name_end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(s.len());
    let name = &s[..name_end];
    if name.is_empty() {
        return Err(FilterError::malformed(0, "missing package name"));
    }
    let alphanumeric_ends = name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric());
    if !alphanumeric_ends {
        return Err(FilterError::malformed(
            0,
            format!("invalid package name `{}`", name),
        ));
    }

    let mut rest = s[name_end..].trim_start();
    let mut extras = Vec::new();
    if let Some(after_bracket) = rest.strip_prefix('[') {
        let (inside, after) = after_bracket
            .split_once(']')
            .ok_or_else(|| FilterError::malformed(0, "unclosed `[` in extras"))?;
        extras = inside
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
        rest = after.trim_start();
    }

    if rest.starts_with('@') {
        return Err(FilterError::malformed(
            0,
            format!("URL requirement for `{}` is not supported", name),
        ));
    }

    if let Some(inner) = rest.strip_prefix('(') {
        rest = inner
            .trim_end()
            .strip_suffix(')')
            .ok_or_else(|| FilterError::malformed(0, "unclosed `(` in version specifiers"))?;
    }

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(FilterError::malformed(
            0,
            format!("missing version specifier for `{}`", name),
        ));
    }

    let specifiers = rest
        .split(',')
        .map(|clause| {
            if clause.trim().is_empty() {
                Err(FilterError::malformed(0, "empty version specifier"))
            } else {
                Specifier::parse(clause)
            }
        })
        .collect::<Result<SmallVec<[Specifier; 4]>>>()?;

    Ok(Requirement {
        name: name.to_string(),
        extras,
        specifiers,
    })
}
