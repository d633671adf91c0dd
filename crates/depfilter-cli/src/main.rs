use std::process::ExitCode;

use clap::Parser;
use owo_colors::{Stream, Style};

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{paint, CliError};

fn main() -> ExitCode {
    let cli = Cli::parse();

    depfilter::console::init_with(match cli.verbose {
        0 => "depfilter=warn",
        1 => "depfilter=info",
        2 => "depfilter=debug",
        _ => "depfilter=trace",
    });

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!(
                "{} {}",
                paint("error:", Stream::Stderr, Style::new().bright_red().bold()),
                e
            );
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Check {
            package,
            version,
            env,
        } => {
            let config = commands::resolve_config(config_path, &env)?;
            commands::check(&config, &package, &version, cli.json)
        }
        Commands::Select {
            package,
            versions,
            pre,
            env,
        } => {
            let mut config = commands::resolve_config(config_path, &env)?;
            if pre {
                config.resolver.allow_prereleases = true;
            }
            commands::select(&config, &package, &versions, cli.json)
        }
        Commands::Lint { files } => commands::lint(&files, cli.json),
    }
}
