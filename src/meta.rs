//! Domain dispatch: expand the globs, then hand the files to the linter for
//! the selected domain.

use crate::config::Config;
use crate::error::{LintError, PatternError};
use crate::jobs::JobsLinter;
use crate::paths;
use crate::policy::{self, Policy};
use crate::report::{FileReport, RunResult};
use crate::rules::RulesLinter;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Which kind of file is being linted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    Rules,
    Jobs,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Rules => "rules",
            Domain::Jobs => "jobs",
        }
    }
}

impl FromStr for Domain {
    type Err = LintError;

    /// Case-insensitive. `targets` is accepted as another name for `jobs`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rules" => Ok(Domain::Rules),
            "jobs" | "targets" => Ok(Domain::Jobs),
            _ => Err(LintError::UnknownDomain(s.to_string())),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A linter for one domain. An instance carries the uniqueness state of a
/// single run, so [`lint_files`](FileLinter::lint_files) consumes it.
pub trait FileLinter: Sized {
    /// Domain name used in progress logs.
    const KIND: &'static str;

    /// Lint one document. `path` is only used to label findings.
    fn lint_source(&mut self, path: &Path, input: &str) -> Result<FileReport, LintError>;

    /// Read and lint one file.
    fn lint_file(&mut self, path: &Path) -> Result<FileReport, LintError> {
        tracing::info!("Processing '{}' {} file...", path.display(), Self::KIND);
        let input = fs::read_to_string(path).map_err(|source| LintError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.lint_source(path, &input)
    }

    /// Lint `files` in order. The first unreadable or unparseable file stops
    /// the run.
    fn lint_files<P: AsRef<Path>>(mut self, files: &[P]) -> Result<RunResult, LintError> {
        let mut result = RunResult::default();
        for path in files {
            let report = self.lint_file(path.as_ref())?;
            result.files.push(report);
        }
        Ok(result)
    }
}

/// Routes lint runs to the rule-group or job linter. Holds the compiled
/// policy; every run gets fresh uniqueness state.
#[derive(Clone, Debug)]
pub struct MetaLinter {
    policy: Policy,
}

impl MetaLinter {
    pub fn new(policy: Policy) -> Self {
        MetaLinter { policy }
    }

    pub fn from_config(config: &Config) -> Result<Self, PatternError> {
        Ok(MetaLinter::new(policy::compile(config)?))
    }

    /// Parse `domain`, expand `patterns`, and lint the matched files. An
    /// unknown domain is rejected before any file system access.
    pub fn lint_as<S: AsRef<str>>(
        &self,
        domain: &str,
        patterns: &[S],
    ) -> Result<RunResult, LintError> {
        let domain: Domain = domain.parse()?;
        self.lint(domain, patterns)
    }

    /// Expand `patterns` and lint the matched files as `domain`.
    pub fn lint<S: AsRef<str>>(
        &self,
        domain: Domain,
        patterns: &[S],
    ) -> Result<RunResult, LintError> {
        let files = paths::expand(patterns)?;
        self.lint_files(domain, &files)
    }

    /// Lint an already expanded file list as `domain`.
    pub fn lint_files<P: AsRef<Path>>(
        &self,
        domain: Domain,
        files: &[P],
    ) -> Result<RunResult, LintError> {
        match domain {
            Domain::Rules => RulesLinter::new(&self.policy.rules).lint_files(files),
            Domain::Jobs => JobsLinter::new(&self.policy.jobs).lint_files(files),
        }
    }
}
