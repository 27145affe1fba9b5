//! CLI argument model for Ripple.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::ScanConfig;

#[derive(Debug, Parser)]
#[command(name = "ripple")]
#[command(about = "Ripple - find where each API endpoint is referenced in a codebase")]
#[command(after_help = "Examples:
  ripple --spec fixtures/api.yaml --dir ./src
  ripple --spec openapi.json --dir ../my-project --format json -o report.json")]
pub struct Cli {
    /// OpenAPI spec file (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub spec: PathBuf,

    /// Root directory of the code to scan
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Config file (.yaml, .json or .toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of scan workers
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// File extension to scan (repeatable, replaces the defaults)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Directory name to skip (repeatable, replaces the defaults)
    #[arg(long = "skip", value_name = "DIR")]
    pub skip_dirs: Vec<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with status 2 when any endpoint is unreferenced
    #[arg(long)]
    pub fail_on_unreferenced: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Build the scan config: defaults, then the config file, then flags.
    pub fn scan_config(&self) -> ScanConfig {
        let base = match &self.config {
            Some(path) => ScanConfig::load(path),
            None => ScanConfig::default(),
        };
        let non_empty = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());
        base.with_overrides(
            non_empty(&self.extensions),
            non_empty(&self.skip_dirs),
            self.workers,
        )
    }
}
