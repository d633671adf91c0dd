//! depfilter - Exclude known-broken dependency versions per environment
//!
//! Load a constraint list, describe the environment, and ask whether a
//! candidate version is excluded.
//!
//! # Example
//!
//! ```rust
//! use depfilter::prelude::*;
//!
//! let rules = ConstraintSet::builtin().unwrap();
//! let env = Environment::parse("3.10", "Windows").unwrap();
//!
//! assert!(rules.is_excluded("torch", "1.12.5", &env).unwrap());
//! assert!(!rules.is_excluded("torch", "1.12.5", &Environment::parse("3.9", "Windows").unwrap()).unwrap());
//! ```

// Core types
pub use depfilter_core::{
    normalize_package_name, Environment, FilterError, Platform, Result, Version, VersionPattern,
};

// Rules
pub use depfilter_rules::{
    parse, Constraint, ConstraintSet, Marker, Operator, Specifier, BUILTIN_RULES,
};

// Configuration
pub use depfilter_config::{ConfigError, FilterConfig};

mod resolver;
pub use resolver::{load_rules, Resolver};

#[cfg(feature = "console")]
pub use depfilter_console as console;


pub mod prelude {
    pub use super::{
        Constraint, ConstraintSet, Environment, FilterConfig, FilterError, Platform, Resolver,
        Version, VersionPattern,
    };
}
