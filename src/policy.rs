//! Compiled policies.
//!
//! [`compile`] turns a [`Config`] into a [`Policy`] with every regex built up
//! front. A bad pattern is a configuration error and stops the run before any
//! file is read.

use crate::config::{Config, JobsConfig, KeyMatchConfig, RulesConfig};
use crate::error::PatternError;
use regex::Regex;
use std::fmt;

/// A compiled regex that remembers the text it was written as.
#[derive(Clone, Debug)]
pub struct FieldPattern {
    raw: String,
    re: Regex,
}

impl FieldPattern {
    pub fn new(raw: &str, field: &str) -> Result<Self, PatternError> {
        let re = Regex::new(raw).map_err(|source| PatternError {
            field: field.to_string(),
            pattern: raw.to_string(),
            source,
        })?;
        Ok(FieldPattern {
            raw: raw.to_string(),
            re,
        })
    }

    /// Compile `raw` unless it is empty, which means "no constraint".
    pub fn optional(raw: &str, field: &str) -> Result<Option<Self>, PatternError> {
        if raw.is_empty() {
            return Ok(None);
        }
        FieldPattern::new(raw, field).map(Some)
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.re.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A value constraint that opts in by key: it only applies to keys its name
/// pattern matches.
#[derive(Clone, Debug)]
pub struct KeyMatch {
    name: FieldPattern,
    value: FieldPattern,
}

impl KeyMatch {
    pub fn compile(config: &KeyMatchConfig, field: &str) -> Result<Self, PatternError> {
        Ok(KeyMatch {
            name: FieldPattern::new(&config.name, &format!("{}.name", field))?,
            value: FieldPattern::new(&config.value, &format!("{}.match", field))?,
        })
    }

    /// True when the name pattern selects `key`.
    pub fn applies_to(&self, key: &str) -> bool {
        self.name.is_match(key)
    }

    /// Returns `true` when the pair satisfies the policy. Keys the name
    /// pattern does not select always satisfy it.
    pub fn matches(&self, key: &str, value: &str) -> bool {
        !self.applies_to(key) || self.value.is_match(value)
    }

    pub fn name_pattern(&self) -> &str {
        self.name.as_str()
    }

    pub fn value_pattern(&self) -> &str {
        self.value.as_str()
    }
}

fn compile_key_matches(
    configs: &[KeyMatchConfig],
    field: &str,
) -> Result<Vec<KeyMatch>, PatternError> {
    configs
        .iter()
        .enumerate()
        .map(|(i, c)| KeyMatch::compile(c, &format!("{}[{}]", field, i)))
        .collect()
}

/// Compiled rule-group policy.
#[derive(Clone, Debug)]
pub struct RulesPolicy {
    pub one_group_per_file: bool,
    pub unique_group_name: bool,
    pub require_group_name: bool,
    pub require_group_rules: bool,
    pub require_rule_alert: bool,
    pub require_rule_expr: bool,
    pub group_name: Option<FieldPattern>,
    pub rule_alert: Option<FieldPattern>,
    pub require_rule_labels: Vec<String>,
    pub require_rule_annotations: Vec<String>,
    pub match_rule_labels: Vec<KeyMatch>,
    pub match_rule_annotations: Vec<KeyMatch>,
}

impl RulesPolicy {
    pub fn compile(config: &RulesConfig) -> Result<Self, PatternError> {
        Ok(RulesPolicy {
            one_group_per_file: config.one_group_per_file,
            unique_group_name: config.unique_group_name,
            require_group_name: config.require_group_name,
            require_group_rules: config.require_group_rules,
            require_rule_alert: config.require_rule_alert,
            require_rule_expr: config.require_rule_expr,
            group_name: FieldPattern::optional(&config.match_group_name, "rules.matchGroupName")?,
            rule_alert: FieldPattern::optional(
                &config.match_rule_alert,
                "rules.matchRuleAlertName",
            )?,
            require_rule_labels: config.require_rule_labels.clone(),
            require_rule_annotations: config.require_rule_annotations.clone(),
            match_rule_labels: compile_key_matches(
                &config.match_rule_labels,
                "rules.matchRuleLabels",
            )?,
            match_rule_annotations: compile_key_matches(
                &config.match_rule_annotations,
                "rules.matchRuleAnnotations",
            )?,
        })
    }
}

/// Compiled scrape-job policy.
#[derive(Clone, Debug)]
pub struct JobsPolicy {
    pub unique_job_name: bool,
    pub unique_target: bool,
    pub require_target_labels: Vec<String>,
}

impl JobsPolicy {
    pub fn compile(config: &JobsConfig) -> Self {
        JobsPolicy {
            unique_job_name: config.unique_job_name,
            unique_target: config.unique_target,
            require_target_labels: config.require_target_labels.clone(),
        }
    }
}

/// Both domain policies, resolved and read-only for the rest of the run.
#[derive(Clone, Debug)]
pub struct Policy {
    pub rules: RulesPolicy,
    pub jobs: JobsPolicy,
}

/// Compile every pattern in `config`.
pub fn compile(config: &Config) -> Result<Policy, PatternError> {
    Ok(Policy {
        rules: RulesPolicy::compile(&config.rules)?,
        jobs: JobsPolicy::compile(&config.jobs),
    })
}
