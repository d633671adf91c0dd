//! Configuration system for depfilter.
//!
//! Describe the target environment, the constraint files to load and the
//! resolver policy in a TOML (or YAML) file instead of command-line flags.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use depfilter_config::FilterConfig;
//! use depfilter_core::Platform;
//!
//! let config = FilterConfig::from_toml_str(r#"
//!     [environment]
//!     python_version = "3.10"
//!     platform_system = "windows"
//!
//!     [rules]
//!     files = ["constraints/extra.txt"]
//! "#).unwrap();
//!
//! let env = config.environment().unwrap();
//! assert_eq!(env.platform(), &Platform::Windows);
//! assert!(config.rules.include_builtin);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use depfilter_config::FilterConfig;
//!
//! let config = FilterConfig::load("depfilter.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use depfilter_core::{Environment, FilterError, Platform, Version};


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Constraint error: {0}")]
    Rules(#[from] FilterError),
}

/// Main filter configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterConfig {
    /// Environment the dependencies are resolved for.
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Constraint sources.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Candidate selection policy.
    #[serde(default)]
    pub resolver: ResolverConfig,
}

impl FilterConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension
    /// (`.yaml`/`.yml` for YAML, TOML otherwise).
    ///
    /// Relative rule file paths are resolved against the config file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML/YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let mut config = if is_yaml {
            Self::from_yaml_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        if let Some(base) = path.parent() {
            config.rules.resolve_relative_to(base);
        }
        tracing::debug!(event = "config_loaded", path = %path.display());
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the interpreter version.
    pub fn with_python_version(mut self, version: impl Into<String>) -> Self {
        self.environment.python_version = Some(version.into());
        self
    }

    /// Sets the platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.environment.platform_system = Some(platform);
        self
    }

    /// Adds a constraint file.
    pub fn with_rules_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules.files.push(path.into());
        self
    }

    /// Returns the configured environment.
    ///
    /// Delegates to [`EnvironmentConfig::to_environment`].
    pub fn environment(&self) -> Result<Environment, ConfigError> {
        self.environment.to_environment()
    }
}

/// Target environment configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EnvironmentConfig {
    /// Interpreter version, e.g. `"3.10"` or `"3.10.11"`. Required.
    pub python_version: Option<String>,

    /// Platform name (`Windows`, `Darwin`, `Linux`, ...). Defaults to
    /// the host platform.
    pub platform_system: Option<Platform>,

    /// Machine architecture, e.g. `x86_64`.
    pub platform_machine: Option<String>,
}

impl EnvironmentConfig {
    /// Builds the environment, filling the platform from the host.
    pub fn to_environment(&self) -> Result<Environment, ConfigError> {
        let python = self
            .python_version
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("environment.python_version is required".into()))?;
        let version = Version::parse(python)
            .map_err(|e| ConfigError::Invalid(format!("environment.python_version: {}", e)))?;
        let platform = self.platform_system.clone().unwrap_or_else(Platform::host);

        let env = Environment::new(version, platform);
        Ok(match &self.platform_machine {
            Some(machine) => env.with_machine(machine.clone()),
            None => env,
        })
    }
}

/// Constraint source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RulesConfig {
    /// Whether to load the built-in broken-dependency list.
    #[serde(default = "default_true")]
    pub include_builtin: bool,

    /// Additional constraint files, loaded in order.
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            files: Vec::new(),
        }
    }
}

impl RulesConfig {
    fn resolve_relative_to(&mut self, base: &Path) {
        for file in &mut self.files {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }
}

fn default_true() -> bool {
    true
}

/// Resolver configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Whether pre-releases and dev-releases may be selected.
    #[serde(default)]
    pub allow_prereleases: bool,
}
