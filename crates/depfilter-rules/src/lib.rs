//! Constraint rules for depfilter.
//!
//! This crate turns constraint text into queryable rules in two
//! independent stages:
//! - [`parse`]: tokenizes each line into package, specifiers and condition
//! - [`Constraint`] / [`Marker`]: evaluate a parsed line against an
//!   [`Environment`](depfilter_core::Environment)
//!
//! [`ConstraintSet`] ties both together and answers `is_excluded`.

pub mod constraint;
pub mod marker;
pub mod parse;
pub mod set;
pub mod specifier;

#[cfg(test)]
mod tests;

pub use constraint::Constraint;
pub use marker::{CompareOp, Marker, MarkerValue, MarkerVar};
pub use set::{ConstraintSet, BUILTIN_RULES};
pub use specifier::{Operator, Specifier};
