//! Shared test fixtures for depfilter crates.
//!
//! This crate provides environments and constraint text for testing.
//! It only depends on `depfilter-core` so every other crate can use it
//! as a dev-dependency without cycles.
//!
//! - [`env`] - Named environments (interpreter version + platform)
//! - [`rules`] - Constraint file snippets, valid and malformed
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! depfilter-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use depfilter_test::env::{windows, linux};
//! use depfilter_test::rules::TORCH_ONLY;
//! ```

pub mod env;
pub mod rules;

pub use env::{darwin, linux, windows};
