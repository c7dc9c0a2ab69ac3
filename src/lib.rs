//! Policy linter for Prometheus rule groups and scrape jobs.
//!
//! Files are checked against a configurable policy and **every** violation is
//! reported, not just the first:
//!
//! ```text
//! Config → compile → Policy ─┐
//! globs → expand → files ────┴→ parse (per file) → lint → RunResult
//! ```
//!
//! Two domains are supported:
//!
//! - `rules`: Prometheus rule files, plain (`groups:`) or wrapped in a
//!   Prometheus operator `PrometheusRule` resource (`spec.groups:`).
//! - `jobs`: scrape job lists, bare or under `scrape_configs:`.
//!
//! Uniqueness checks (group names, job names, scrape targets) span every file
//! of one run: the first occurrence wins and later duplicates are flagged.
//!
//! # Quick Start
//!
//! ```rust
//! use promlint::{Config, FileLinter, RulesLinter, policy};
//! use std::path::Path;
//!
//! let yaml = r#"
//! groups:
//!   - name: node
//!     rules:
//!       - alert: NodeDown
//!         expr: up == 0
//!         for: 5m
//!         labels:
//!           severity: critical
//! "#;
//!
//! let policy = policy::compile(&Config::default()).expect("default policy compiles");
//! let mut linter = RulesLinter::new(&policy.rules);
//! let report = linter.lint_source(Path::new("node.yaml"), yaml).expect("valid YAML");
//! assert!(report.is_clean());
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | yes     | Builds the `promlint` binary (clap, tracing-subscriber). |

pub mod config;
pub mod error;
pub mod jobs;
pub mod meta;
pub mod parse;
pub mod paths;
pub mod policy;
pub mod primitives;
pub mod report;
pub mod rules;
pub mod types;

pub use config::Config;
pub use error::*;
pub use jobs::JobsLinter;
pub use meta::{Domain, FileLinter, MetaLinter};
pub use policy::Policy;
pub use report::{
    Check, EXIT_FATAL, EXIT_FINDINGS, EXIT_SUCCESS, FileReport, FileStatus, Finding, RunResult,
    exit_code,
};
pub use rules::RulesLinter;
pub use types::*;

/// Convenience entry point composing domain selection → compile → expand →
/// lint.
///
/// The domain is checked before the policy is compiled or any path touched.
///
/// # Errors
///
/// Returns [`LintError`] for an unknown domain, an invalid pattern in the
/// configuration, an invalid glob, or a file that cannot be read or parsed.
/// Policy violations are not errors; they are in the returned [`RunResult`].
///
/// # Example
///
/// ```rust,no_run
/// let result = promlint::lint_as(&promlint::Config::default(), "rules", &["rules/*.yaml"])
///     .expect("run completes");
/// if !result.passed() {
///     for finding in result.findings() {
///         eprintln!("{}", finding);
///     }
/// }
/// ```
pub fn lint_as<S: AsRef<str>>(
    config: &Config,
    domain: &str,
    patterns: &[S],
) -> Result<RunResult, LintError> {
    let domain: Domain = domain.parse()?;
    let linter = MetaLinter::from_config(config)?;
    linter.lint(domain, patterns)
}
