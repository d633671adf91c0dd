use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "depfilter.toml";

#[derive(Parser, Debug)]
#[command(
    name = "depfilter",
    version,
    about = "Check dependency versions against known-broken constraint lists"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Log more (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,
    #[arg(
        long,
        global = true,
        help = "Configuration file (TOML or YAML); defaults to ./depfilter.toml when present"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report whether one version (or `X.Y.*` series) is excluded.
    Check {
        package: String,
        version: String,
        #[command(flatten)]
        env: EnvArgs,
    },
    /// Pick the highest allowed version among candidates.
    Select {
        package: String,
        #[arg(required = true)]
        versions: Vec<String>,
        #[arg(long, default_value_t = false, help = "Allow pre-releases and dev-releases")]
        pre: bool,
        #[command(flatten)]
        env: EnvArgs,
    },
    /// Parse constraint files and report the first error in each.
    Lint {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct EnvArgs {
    #[arg(long, help = "Interpreter version, e.g. 3.10 or 3.10.11")]
    pub python: Option<String>,
    #[arg(long, help = "Platform name (Windows, Darwin, Linux); defaults to the host")]
    pub platform: Option<String>,
    #[arg(long, help = "Machine architecture for platform_machine conditions")]
    pub machine: Option<String>,
    #[arg(long = "rules", help = "Additional constraint file (repeatable)")]
    pub rules: Vec<PathBuf>,
    #[arg(long, default_value_t = false, help = "Skip the built-in broken-dependency list")]
    pub no_builtin: bool,
}
