//! Scrape-job linter.
//!
//! Job names and `<metrics_path>:<target>` identities are tracked across every
//! file of the run, so a duplicate in a later file is flagged while its first
//! occurrence is not.

use crate::error::LintError;
use crate::meta::FileLinter;
use crate::parse::{Parsed, parse_jobs};
use crate::policy::JobsPolicy;
use crate::report::{self, Check, FileReport, Finding, Violation};
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;

/// State accumulated across the files of one run.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    job_names: HashSet<String>,
    targets: HashSet<String>,
}

pub struct JobsLinter<'p> {
    policy: &'p JobsPolicy,
    state: RunState,
}

impl<'p> JobsLinter<'p> {
    pub fn new(policy: &'p JobsPolicy) -> Self {
        JobsLinter {
            policy,
            state: RunState::default(),
        }
    }

    pub fn lint_project(&mut self, file: &Path, project: &JobsProject) -> Vec<Finding> {
        let mut findings = Vec::new();
        for job in &project.jobs {
            let violations = self.lint_job(job);
            report::record(&mut findings, file, &job.to_string(), violations);
        }
        findings
    }

    fn lint_job(&mut self, job: &Job) -> Vec<Violation> {
        let mut violations = Vec::new();
        let policy = self.policy;

        if policy.unique_job_name && !self.state.job_names.insert(job.name.clone()) {
            violations.push(Violation::new(Check::JobNameUnique, "Job name must be unique"));
        }

        if policy.unique_target {
            for block in &job.static_configs {
                for target in &block.targets {
                    let identity = format!("{}:{}", job.metrics_path, target);
                    if !self.state.targets.insert(identity) {
                        violations.push(Violation::new(
                            Check::TargetUnique,
                            format!("Job target must be unique, found duplicate of {}", target),
                        ));
                    }
                }
            }
        }

        for block in &job.static_configs {
            for key in &policy.require_target_labels {
                if block.labels.get(key).is_none_or(|v| v.is_empty()) {
                    violations.push(Violation::new(
                        Check::TargetLabelRequired,
                        format!("Target label '{}' is required and must be non-empty", key),
                    ));
                }
            }
        }

        violations
    }
}

impl FileLinter for JobsLinter<'_> {
    const KIND: &'static str = "jobs";

    fn lint_source(&mut self, path: &Path, input: &str) -> Result<FileReport, LintError> {
        let parsed = parse_jobs(input).map_err(|source| LintError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        match parsed {
            Parsed::Empty => {
                tracing::warn!("File {} is empty, skipping", path.display());
                Ok(FileReport::skipped(path))
            }
            Parsed::Project(project) => {
                let findings = self.lint_project(path, &project);
                Ok(FileReport::checked(path, findings))
            }
        }
    }
}
