//! Findings and run results.

use crate::error::LintError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The policy check a finding comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    GroupPerFile,
    GroupNameUnique,
    GroupNameRequired,
    GroupNameMatch,
    GroupRulesRequired,
    AlertNameRequired,
    AlertNameMatch,
    ExprRequired,
    LabelRequired,
    LabelMatch,
    AnnotationRequired,
    AnnotationMatch,
    JobNameUnique,
    TargetUnique,
    TargetLabelRequired,
}

/// One policy violation, before it is attached to a subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Violation {
    pub check: Check,
    pub message: String,
}

impl Violation {
    pub(crate) fn new(check: Check, message: impl Into<String>) -> Self {
        Violation {
            check,
            message: message.into(),
        }
    }
}

/// A policy violation found in a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// File the entity came from.
    pub file: PathBuf,
    /// Display path of the entity: `group`, `group > rule`, a job name, or the
    /// file itself for file-level checks.
    pub subject: String,
    pub check: Check,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subject.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.subject, self.message)
        }
    }
}

/// Attach `violations` to `subject`, log them together, and append them to
/// `findings`.
pub(crate) fn record(
    findings: &mut Vec<Finding>,
    file: &Path,
    subject: &str,
    violations: Vec<Violation>,
) {
    for v in violations {
        let finding = Finding {
            file: file.to_path_buf(),
            subject: subject.to_string(),
            check: v.check,
            message: v.message,
        };
        tracing::error!("{}", finding);
        findings.push(finding);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Checked,
    /// The file held nothing to validate.
    Skipped,
}

/// What happened to one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub findings: Vec<Finding>,
}

impl FileReport {
    pub fn checked(path: &Path, findings: Vec<Finding>) -> Self {
        FileReport {
            path: path.to_path_buf(),
            status: FileStatus::Checked,
            findings,
        }
    }

    pub fn skipped(path: &Path) -> Self {
        FileReport {
            path: path.to_path_buf(),
            status: FileStatus::Skipped,
            findings: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// The run completed and no file has findings.
pub const EXIT_SUCCESS: u8 = 0;
/// A fatal setup or input error stopped the run.
pub const EXIT_FATAL: u8 = 1;
/// The run completed and at least one file has findings.
pub const EXIT_FINDINGS: u8 = 2;

/// Process exit status for the outcome of a run. Skipped files do not affect
/// it.
pub fn exit_code(outcome: &Result<RunResult, LintError>) -> u8 {
    match outcome {
        Ok(result) if result.passed() => EXIT_SUCCESS,
        Ok(_) => EXIT_FINDINGS,
        Err(_) => EXIT_FATAL,
    }
}

/// Aggregate result of one run, files in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub files: Vec<FileReport>,
}

impl RunResult {
    /// True when no file produced a finding.
    pub fn passed(&self) -> bool {
        self.files.iter().all(FileReport::is_clean)
    }

    /// Every finding, in the order it was produced.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.iter().flat_map(|f| f.findings.iter())
    }

    pub fn finding_count(&self) -> usize {
        self.files.iter().map(|f| f.findings.len()).sum()
    }

    /// Files that had at least one finding.
    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|f| !f.is_clean()).count()
    }

    /// Files skipped because they held nothing to validate.
    pub fn skipped(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Skipped)
            .map(|f| f.path.as_path())
    }
}
