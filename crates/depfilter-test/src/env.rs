//! Environment fixtures.
//!
//! # Example
//!
//! ```
//! use depfilter_test::env::windows;
//!
//! let env = windows("3.10");
//! assert_eq!(env.platform().system_name(), "Windows");
//! ```

use depfilter_core::{Environment, Platform, Version};

/// Builds an environment, panicking on an invalid version literal.
pub fn environment(python: &str, platform: Platform) -> Environment {
    let version = Version::parse(python)
        .unwrap_or_else(|e| panic!("fixture version `{}` is invalid: {}", python, e));
    Environment::new(version, platform)
}

/// A Windows environment with the given interpreter version.
pub fn windows(python: &str) -> Environment {
    environment(python, Platform::Windows)
}

/// A macOS environment with the given interpreter version.
pub fn darwin(python: &str) -> Environment {
    environment(python, Platform::Darwin)
}

/// A Linux environment with the given interpreter version.
pub fn linux(python: &str) -> Environment {
    environment(python, Platform::Linux)
}

/// One environment per platform for each interpreter in `pythons`.
pub fn matrix(pythons: &[&str]) -> Vec<Environment> {
    pythons
        .iter()
        .flat_map(|python| [windows(python), darwin(python), linux(python)])
        .collect()
}
