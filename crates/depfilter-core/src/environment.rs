//! Environment descriptors used to evaluate constraint conditions.

use std::fmt;

use crate::error::Result;
use crate::version::Version;

/// Operating-system family, spelled the way `platform_system` reports it.
///
/// # Examples
///
/// ```
/// use depfilter_core::Platform;
///
/// assert_eq!(Platform::from_name("macos"), Platform::Darwin);
/// assert_eq!(Platform::from_name("WINDOWS").system_name(), "Windows");
/// assert_eq!(Platform::Linux.sys_platform(), "linux");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(from = "String", into = "String")
)]
pub enum Platform {
    Windows,
    Darwin,
    Linux,
    /// Any other system, kept as written.
    Other(String),
}

impl Platform {
    /// Parses a platform name case-insensitively.
    ///
    /// Accepts `platform_system` spellings (`Windows`, `Darwin`, `Linux`),
    /// `sys_platform` spellings (`win32`, `darwin`, `linux`) and Rust target
    /// names (`windows`, `macos`).
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win" | "nt" => Platform::Windows,
            "darwin" | "macos" | "osx" | "mac" => Platform::Darwin,
            "linux" | "linux2" => Platform::Linux,
            _ => Platform::Other(name.to_string()),
        }
    }

    /// Returns the platform the current process runs on.
    pub fn host() -> Self {
        Platform::from_name(std::env::consts::OS)
    }

    /// Returns the `platform_system` marker value.
    pub fn system_name(&self) -> &str {
        match self {
            Platform::Windows => "Windows",
            Platform::Darwin => "Darwin",
            Platform::Linux => "Linux",
            Platform::Other(name) => name,
        }
    }

    /// Returns the `sys_platform` marker value.
    pub fn sys_platform(&self) -> String {
        match self {
            Platform::Windows => "win32".to_string(),
            Platform::Darwin => "darwin".to_string(),
            Platform::Linux => "linux".to_string(),
            Platform::Other(name) => name.to_ascii_lowercase(),
        }
    }

    /// Returns the `os_name` marker value.
    pub fn os_name(&self) -> &'static str {
        match self {
            Platform::Windows => "nt",
            _ => "posix",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.system_name())
    }
}

impl From<String> for Platform {
    fn from(name: String) -> Self {
        Platform::from_name(&name)
    }
}

impl From<&str> for Platform {
    fn from(name: &str) -> Self {
        Platform::from_name(name)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.system_name().to_string()
    }
}

/// The environment a dependency is being resolved for.
///
/// # Examples
///
/// ```
/// use depfilter_core::{Environment, Platform};
///
/// let env = Environment::parse("3.10.4", "Windows").unwrap();
/// assert_eq!(env.python_version().to_string(), "3.10");
/// assert_eq!(env.python_full_version().to_string(), "3.10.4");
/// assert_eq!(env.platform(), &Platform::Windows);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    interpreter_version: Version,
    platform: Platform,
    machine: Option<String>,
}

impl Environment {
    /// Creates an environment from an interpreter version and platform.
    pub fn new(interpreter_version: Version, platform: Platform) -> Self {
        Self {
            interpreter_version,
            platform,
            machine: None,
        }
    }

    /// Parses an environment from an interpreter version string and a
    /// platform name.
    pub fn parse(interpreter_version: &str, platform: &str) -> Result<Self> {
        Ok(Self::new(
            Version::parse(interpreter_version)?,
            Platform::from_name(platform),
        ))
    }

    /// Creates an environment for the host platform.
    pub fn host(interpreter_version: Version) -> Self {
        Self::new(interpreter_version, Platform::host())
    }

    /// Sets the machine architecture (`platform_machine`).
    pub fn with_machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = Some(machine.into());
        self
    }

    /// Returns the `python_version` marker value (major.minor).
    pub fn python_version(&self) -> Version {
        self.interpreter_version.truncated(2)
    }

    /// Returns the full interpreter version.
    pub fn python_full_version(&self) -> &Version {
        &self.interpreter_version
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn machine(&self) -> Option<&str> {
        self.machine.as_deref()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "python {} on {}", self.interpreter_version, self.platform)?;
        if let Some(machine) = &self.machine {
            write!(f, " ({})", machine)?;
        }
        Ok(())
    }
}
