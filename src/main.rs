use clap::Parser;
use dectest::cli::Cli;
use dectest::config;
use dectest::format::{self, Report};
use dectest::logging::init_logging;
use dectest::util::progress::{SourceProgress, should_show_progress};
use dectest::{BigDecimalEngine, Harness, HarnessError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
        // Continue without logging
    }

    match run(&cli) {
        Ok(report) => print_report(&report, cli.json),
        Err(e) => handle_error(&e, cli.json),
    }
}

fn run(cli: &Cli) -> Result<Report, HarnessError> {
    let sources = cli.sources();
    if sources.is_empty() {
        return Err(HarnessError::NoInputs);
    }

    let config = config::load_config(cli.config.as_deref(), &cli.overrides())?;
    tracing::info!(
        dialect = %config.dialect,
        internal_precision = config.internal_precision,
        sources = sources.len(),
        "Starting run"
    );

    let engine = BigDecimalEngine::new(config.internal_precision);
    let mut harness = Harness::new(engine, config.dialect, config.internal_precision)
        .with_session(config.session());
    let progress = SourceProgress::new(
        sources.len(),
        should_show_progress(sources.len(), cli.verbose, cli.json),
    );
    harness.run_files(&sources, &progress)?;
    Ok(harness.into_report())
}

fn print_report(report: &Report, json_mode: bool) {
    if json_mode {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => handle_error(&HarnessError::Json(e), true),
        }
        return;
    }
    for failure in &report.failures {
        eprintln!("{}", format::failure_line(failure));
    }
    println!("{}", format::summary_line(&report.counters));
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &HarnessError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    // Determine output mode: JSON if --json flag or stdout is not a terminal
    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}
