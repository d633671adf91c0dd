//! Colorful console output for depfilter.
//!
//! Provides a custom `tracing` layer that formats filter events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (rules loaded, versions selected)
//! - **DEBUG**: Rejected candidates, configuration loading
//! - **TRACE**: Individual exclusion checks
//!
//! Output goes to stderr so command output on stdout stays machine-readable.

use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[cfg(test)]
mod tests;

static INIT: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "depfilter=info";

/// Initializes console output with the default filter.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides the default directive.
pub fn init() {
    init_with(DEFAULT_DIRECTIVE);
}

/// Initializes console output, using `directive` when `RUST_LOG` is unset.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init_with(directive: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
        });

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(FilterConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats depfilter events with colors.
pub struct FilterConsoleLayer;

impl<S: Subscriber> Layer<S> for FilterConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        // Accept events from depfilter crates only
        if !metadata.target().starts_with("depfilter") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    package: Option<String>,
    version: Option<String>,
    path: Option<String>,
    environment: Option<String>,
    count: Option<u64>,
    line: Option<u64>,
    candidates: Option<u64>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "message" => self.message = Some(value),
            "package" => self.package = Some(value),
            "version" => self.version = Some(value),
            "path" => self.path = Some(value),
            "environment" => self.environment = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "count" | "constraint_count" => self.count = Some(value),
            "line" => self.line = Some(value),
            "candidates" => self.candidates = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    let body = match event {
        "constraints_loaded" => format_constraints_loaded(v),
        "resolver_ready" => format_resolver_ready(v),
        "rejected" | "excluded" => format_rejected(v),
        "selected" => format_selected(v),
        "no_candidate" => format_no_candidate(v),
        _ => match &v.message {
            Some(message) => message.clone(),
            None => return String::new(),
        },
    };

    format!("{} {}", format_level(level), body)
}

fn format_level(level: Level) -> String {
    match level {
        Level::ERROR => "error".bright_red().bold().to_string(),
        Level::WARN => " warn".bright_yellow().bold().to_string(),
        Level::INFO => " info".bright_green().to_string(),
        Level::DEBUG => "debug".bright_blue().to_string(),
        Level::TRACE => "trace".bright_black().to_string(),
    }
}

fn format_constraints_loaded(v: &EventVisitor) -> String {
    format!(
        "{} Loaded {} constraints from {}",
        "▶".bright_green().bold(),
        v.count.unwrap_or(0).bright_yellow(),
        v.path.as_deref().unwrap_or("<memory>").white().bold()
    )
}

fn format_resolver_ready(v: &EventVisitor) -> String {
    format!(
        "{} Resolving for {} │ {} constraints",
        "▶".bright_green().bold(),
        v.environment.as_deref().unwrap_or("unknown environment").bright_cyan(),
        v.count.unwrap_or(0).bright_yellow()
    )
}

fn format_rejected(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {}",
        "✗".bright_red().bold(),
        v.package.as_deref().unwrap_or("?").white().bold(),
        v.version.as_deref().unwrap_or("?").bright_red()
    );
    if let Some(line) = v.line {
        output.push_str(&format!(" │ rule on line {}", line.bright_yellow()));
    }
    output
}

fn format_selected(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} {}",
        "✓".bright_green().bold(),
        v.package.as_deref().unwrap_or("?").white().bold(),
        v.version.as_deref().unwrap_or("?").bright_green()
    );
    if let Some(candidates) = v.candidates {
        output.push_str(&format!(" │ {} candidates", candidates.bright_yellow()));
    }
    output
}

fn format_no_candidate(v: &EventVisitor) -> String {
    format!(
        "{} no allowed version of {} among {} candidates",
        "■".bright_red().bold(),
        v.package.as_deref().unwrap_or("?").white().bold(),
        v.candidates.unwrap_or(0).bright_yellow()
    )
}
