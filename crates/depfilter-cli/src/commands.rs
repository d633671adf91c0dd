use std::path::{Path, PathBuf};
use std::process::ExitCode;

use owo_colors::{OwoColorize, Stream, Style};
use serde::Serialize;
use thiserror::Error;

use depfilter::{
    load_rules, ConfigError, Constraint, ConstraintSet, FilterConfig, FilterError, Platform,
    Resolver, Version, VersionPattern,
};

use crate::cli::{EnvArgs, DEFAULT_CONFIG_FILE};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Styles `text` when `stream` is a color-capable terminal.
pub fn paint(text: &str, stream: Stream, style: Style) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}

/// Loads `--config`, or `./depfilter.toml` when present, then applies the
/// command-line overrides.
pub fn resolve_config(
    config_path: Option<&Path>,
    env: &EnvArgs,
) -> Result<FilterConfig, CliError> {
    let mut config = match config_path {
        Some(path) => FilterConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => FilterConfig::load(DEFAULT_CONFIG_FILE)?,
        None => FilterConfig::default(),
    };

    if let Some(python) = &env.python {
        config.environment.python_version = Some(python.clone());
    }
    if let Some(platform) = &env.platform {
        config.environment.platform_system = Some(Platform::from_name(platform));
    }
    if let Some(machine) = &env.machine {
        config.environment.platform_machine = Some(machine.clone());
    }
    if env.no_builtin {
        config.rules.include_builtin = false;
    }
    config.rules.files.extend(env.rules.iter().cloned());
    Ok(config)
}

#[derive(Serialize)]
struct RuleReport {
    line: usize,
    constraint: String,
    rationale: Option<String>,
}

impl From<&Constraint> for RuleReport {
    fn from(c: &Constraint) -> Self {
        Self {
            line: c.line(),
            constraint: c.to_string(),
            rationale: c.rationale().map(str::to_string),
        }
    }
}

#[derive(Serialize)]
struct CheckReport {
    package: String,
    version: String,
    environment: String,
    excluded: bool,
    rules: Vec<RuleReport>,
}

pub fn check(
    config: &FilterConfig,
    package: &str,
    version: &str,
    json: bool,
) -> Result<ExitCode, CliError> {
    let rules = load_rules(config)?;
    let env = config.environment()?;
    let excluded = rules.is_excluded(package, version, &env)?;

    let hits: Vec<RuleReport> = match VersionPattern::parse(version)? {
        VersionPattern::Exact(exact) => rules
            .explain(package, &exact, &env)
            .into_iter()
            .map(RuleReport::from)
            .collect(),
        series => rules
            .constraints_for(package)
            .filter(|c| c.excludes_series(&series, &env))
            .map(RuleReport::from)
            .collect(),
    };

    let report = CheckReport {
        package: package.to_string(),
        version: version.to_string(),
        environment: env.to_string(),
        excluded,
        rules: hits,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_check(&report);
    }

    Ok(if excluded {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn print_check(report: &CheckReport) {
    let verdict = if report.excluded {
        paint("excluded", Stream::Stdout, Style::new().bright_red().bold())
    } else {
        paint("allowed", Stream::Stdout, Style::new().bright_green().bold())
    };
    println!(
        "{} {}: {} ({})",
        report.package, report.version, verdict, report.environment
    );
    for rule in &report.rules {
        println!("  line {}: {}", rule.line, rule.constraint);
        if let Some(rationale) = &rule.rationale {
            for line in rationale.lines() {
                println!(
                    "    # {}",
                    paint(line, Stream::Stdout, Style::new().bright_black())
                );
            }
        }
    }
}

#[derive(Serialize)]
struct SelectReport {
    package: String,
    environment: String,
    selected: Option<String>,
    allowed: Vec<String>,
}

pub fn select(
    config: &FilterConfig,
    package: &str,
    versions: &[String],
    json: bool,
) -> Result<ExitCode, CliError> {
    let candidates = versions
        .iter()
        .map(|v| Version::parse(v))
        .collect::<Result<Vec<_>, _>>()?;
    let resolver = Resolver::from_config(config)?;

    let selected = resolver.select(package, &candidates);
    let report = SelectReport {
        package: package.to_string(),
        environment: resolver.environment().to_string(),
        selected: selected.as_ref().map(Version::to_string),
        allowed: resolver
            .filter(package, &candidates)
            .iter()
            .map(Version::to_string)
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &report.selected {
            Some(version) => println!("{}", version),
            None => eprintln!(
                "{} no allowed version of {} ({})",
                paint("error:", Stream::Stderr, Style::new().bright_red().bold()),
                report.package,
                report.environment
            ),
        }
    }

    Ok(if selected.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

#[derive(Serialize)]
struct LintReport {
    file: PathBuf,
    constraints: usize,
    line: Option<usize>,
    error: Option<String>,
}

pub fn lint(files: &[PathBuf], json: bool) -> Result<ExitCode, CliError> {
    let reports: Vec<LintReport> = files
        .iter()
        .map(|file| match ConstraintSet::from_file(file) {
            Ok(set) => LintReport {
                file: file.clone(),
                constraints: set.len(),
                line: None,
                error: None,
            },
            Err(e) => LintReport {
                file: file.clone(),
                constraints: 0,
                line: e.line(),
                error: Some(e.to_string()),
            },
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            match &report.error {
                None => println!(
                    "{}: {} ({} constraints)",
                    report.file.display(),
                    paint("ok", Stream::Stdout, Style::new().bright_green().bold()),
                    report.constraints
                ),
                Some(error) => println!(
                    "{}: {} {}",
                    report.file.display(),
                    paint("error", Stream::Stdout, Style::new().bright_red().bold()),
                    error
                ),
            }
        }
    }

    let failed = reports.iter().any(|r| r.error.is_some());
    Ok(if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
