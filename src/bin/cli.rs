//! Ripple CLI - API impact analysis.
//!
//! Usage:
//!   ripple --spec api.yaml --dir ./src                 # Text report on stdout
//!   ripple --spec api.yaml --dir ./src -f json -o r.json
//!   ripple --spec api.yaml --dir ./src --fail-on-unreferenced

use anyhow::Result;
use clap::Parser;
use ripple::cli::{Cli, OutputFormat};
use ripple::report::{write_report, Report};
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.scan_config();
    let spec = std::path::absolute(&cli.spec).unwrap_or_else(|_| cli.spec.clone());
    let root = cli.dir.canonicalize().unwrap_or_else(|_| cli.dir.clone());

    info!(
        spec = %spec.display(),
        root = %root.display(),
        workers = config.workers,
        extensions = ?config.extensions,
        "starting analysis"
    );

    let analysis = ripple::analyze(&spec, &root, &config, None)?;
    let report = Report::new(&spec, &root, &analysis.result, &analysis.stats);

    let rendered = match cli.format {
        OutputFormat::Text => report.render_text(),
        OutputFormat::Json => format!("{}\n", report.to_json()?),
    };

    match &cli.output {
        Some(path) => {
            write_report(path, &rendered)?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", rendered),
    }

    if cli.fail_on_unreferenced && report.has_unreferenced() {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
