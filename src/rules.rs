//! Rule-group linter.
//!
//! Checks every group and rule of each file against a [`RulesPolicy`]. All
//! violations of one group or rule are collected and reported together under
//! the entity's display path (`group`, or `group > rule`). Group-name
//! uniqueness is tracked across every file of the run.

use crate::error::LintError;
use crate::meta::FileLinter;
use crate::parse::{Parsed, parse_rules};
use crate::policy::{KeyMatch, RulesPolicy};
use crate::report::{self, Check, FileReport, Finding, Violation};
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;

/// State accumulated across the files of one run.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    group_names: HashSet<String>,
}

pub struct RulesLinter<'p> {
    policy: &'p RulesPolicy,
    state: RunState,
}

impl<'p> RulesLinter<'p> {
    pub fn new(policy: &'p RulesPolicy) -> Self {
        RulesLinter {
            policy,
            state: RunState::default(),
        }
    }

    /// Lint a parsed project, returning its findings in document order.
    pub fn lint_project(&mut self, file: &Path, project: &RulesProject) -> Vec<Finding> {
        let mut findings = Vec::new();

        if self.policy.one_group_per_file && project.groups.len() > 1 {
            report::record(
                &mut findings,
                file,
                &file.display().to_string(),
                vec![Violation::new(Check::GroupPerFile, "Allowed one group per file")],
            );
        }

        for group in &project.groups {
            let violations = self.lint_group(group);
            report::record(&mut findings, file, &group.to_string(), violations);

            for rule in &group.rules {
                let violations = self.lint_rule(rule);
                report::record(
                    &mut findings,
                    file,
                    &format!("{} > {}", group, rule),
                    violations,
                );
            }
        }

        findings
    }

    fn lint_group(&mut self, group: &Group) -> Vec<Violation> {
        let mut violations = Vec::new();
        let policy = self.policy;

        if policy.unique_group_name && !self.state.group_names.insert(group.name.clone()) {
            violations.push(Violation::new(
                Check::GroupNameUnique,
                "Group name must be unique",
            ));
        }
        if policy.require_group_name && group.name.is_empty() {
            violations.push(Violation::new(
                Check::GroupNameRequired,
                "Group name is required",
            ));
        }
        if let Some(pattern) = &policy.group_name
            && !pattern.is_match(&group.name)
        {
            violations.push(Violation::new(
                Check::GroupNameMatch,
                format!("Group name must match: {}", pattern),
            ));
        }
        if policy.require_group_rules && group.rules.is_empty() {
            violations.push(Violation::new(
                Check::GroupRulesRequired,
                format!("Rules for group '{}' is required", group.name),
            ));
        }

        violations
    }

    fn lint_rule(&self, rule: &Rule) -> Vec<Violation> {
        let mut violations = Vec::new();
        let policy = self.policy;

        let alerting = match rule {
            Rule::Recording(_) => {
                check_expr(policy, rule.expr(), &mut violations);
                return violations;
            }
            Rule::Alerting(a) => a,
        };

        if policy.require_rule_alert && alerting.alert.is_empty() {
            violations.push(Violation::new(
                Check::AlertNameRequired,
                "Alert name is required",
            ));
        }
        if let Some(pattern) = &policy.rule_alert
            && !pattern.is_match(&alerting.alert)
        {
            violations.push(Violation::new(
                Check::AlertNameMatch,
                format!("Alert name must match: {}", pattern),
            ));
        }
        check_expr(policy, &alerting.expr, &mut violations);

        require_keys(
            &policy.require_rule_labels,
            &alerting.labels,
            KeyKind::Label,
            &mut violations,
        );
        match_keys(
            &policy.match_rule_labels,
            &alerting.labels,
            KeyKind::Label,
            &mut violations,
        );
        require_keys(
            &policy.require_rule_annotations,
            &alerting.annotations,
            KeyKind::Annotation,
            &mut violations,
        );
        match_keys(
            &policy.match_rule_annotations,
            &alerting.annotations,
            KeyKind::Annotation,
            &mut violations,
        );

        violations
    }
}

impl FileLinter for RulesLinter<'_> {
    const KIND: &'static str = "rules";

    fn lint_source(&mut self, path: &Path, input: &str) -> Result<FileReport, LintError> {
        let parsed = parse_rules(input).map_err(|source| LintError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        match parsed {
            Parsed::Empty => {
                tracing::warn!("File {} has no groups to validate, skipping", path.display());
                Ok(FileReport::skipped(path))
            }
            Parsed::Project(project) => {
                let findings = self.lint_project(path, &project);
                Ok(FileReport::checked(path, findings))
            }
        }
    }
}

fn check_expr(policy: &RulesPolicy, expr: &str, violations: &mut Vec<Violation>) {
    if policy.require_rule_expr && expr.is_empty() {
        violations.push(Violation::new(Check::ExprRequired, "Rule expr is required"));
    }
}

#[derive(Clone, Copy)]
enum KeyKind {
    Label,
    Annotation,
}

fn require_keys(
    required: &[String],
    pairs: &Labels,
    kind: KeyKind,
    violations: &mut Vec<Violation>,
) {
    let (check, noun) = match kind {
        KeyKind::Label => (Check::LabelRequired, "label"),
        KeyKind::Annotation => (Check::AnnotationRequired, "annotation"),
    };
    for key in required {
        if pairs.get(key).is_none_or(|v| v.is_empty()) {
            violations.push(Violation::new(
                check,
                format!("Rule {} '{}' is required and must be non-empty", noun, key),
            ));
        }
    }
}

fn match_keys(
    policies: &[KeyMatch],
    pairs: &Labels,
    kind: KeyKind,
    violations: &mut Vec<Violation>,
) {
    let (check, noun) = match kind {
        KeyKind::Label => (Check::LabelMatch, "Label"),
        KeyKind::Annotation => (Check::AnnotationMatch, "Annotation"),
    };
    for (key, value) in pairs {
        for policy in policies {
            if !policy.matches(key, value) {
                violations.push(Violation::new(
                    check,
                    format!(
                        "{} '{}' value '{}' must match: {}",
                        noun,
                        key,
                        value,
                        policy.value_pattern()
                    ),
                ));
            }
        }
    }
}
