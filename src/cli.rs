use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Lint Prometheus rule groups and scrape jobs against a policy.
#[derive(Parser, Debug)]
#[command(name = "promlint", version, about)]
pub struct Args {
    /// Validation domain: `rules` or `jobs` (case-insensitive)
    pub domain: String,

    /// Glob patterns selecting the files to lint
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Configuration file (overrides PROM_LINTER_CONFIG and .prometheus-linter.yaml)
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Log level filter; RUST_LOG takes precedence when set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
