//! depfilter Core - Core types for dependency version filtering
//!
//! This crate provides the fundamental abstractions for depfilter:
//! - Version types with release-segment ordering
//! - Version patterns (exact versions and `X.Y.*` wildcards)
//! - Environment descriptors (interpreter version, platform)
//! - The shared error type

pub mod environment;
pub mod error;
pub mod version;

#[cfg(test)]
mod environment_tests;

pub use environment::{Environment, Platform};
pub use error::{FilterError, Result};
pub use version::{normalize_package_name, PreRelease, Version, VersionPattern};
