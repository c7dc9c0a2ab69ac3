//! YAML → canonical project parsing for both lint domains.
//!
//! Both parsers read the text into a [`serde_json::Value`] with serde-saphyr
//! first, then map it onto named wire shapes. Rule files come either as a
//! plain `groups:` document or wrapped in a Prometheus operator
//! `PrometheusRule` envelope (`spec.groups`); job files come either as a bare
//! sequence of jobs or as a server config with `scrape_configs`. Envelopes are
//! unwrapped by an explicit `promote` step so validation only ever sees one
//! shape per domain.

use crate::error::{ParseError, ParseErrorKind};
use crate::primitives::parse_duration;
use crate::types::scalar;
use crate::types::*;
use serde::Deserialize;
use serde_json::Value;

/// Outcome of parsing one file.
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed<T> {
    /// The document holds nothing to validate (no bytes, only comments,
    /// `null`, or an empty group/job list).
    Empty,
    Project(T),
}

impl<T> Parsed<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Parsed::Empty)
    }

    pub fn project(self) -> Option<T> {
        match self {
            Parsed::Empty => None,
            Parsed::Project(p) => Some(p),
        }
    }
}

// ─── Rule file wire shapes ──────────────────────────────────────────────────

/// A plain Prometheus rule file: top-level `groups`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RuleFile {
    #[serde(default, deserialize_with = "scalar::list")]
    pub groups: Vec<RawGroup>,
}

/// A Prometheus operator `PrometheusRule` resource.
///
/// ```yaml
/// apiVersion: monitoring.coreos.com/v1
/// kind: PrometheusRule
/// metadata:
///   name: kube-rules
/// spec:
///   groups: []
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OperatorEnvelope {
    #[serde(default)]
    pub spec: Option<OperatorSpec>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OperatorSpec {
    #[serde(default, deserialize_with = "scalar::list")]
    pub groups: Vec<RawGroup>,
}

impl OperatorEnvelope {
    /// Lift `spec.groups` to the top level.
    pub fn promote(self) -> RuleFile {
        RuleFile {
            groups: self.spec.map(|s| s.groups).unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawGroup {
    #[serde(default, deserialize_with = "scalar::string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar::list")]
    pub rules: Vec<RawRule>,
}

/// A rule before its kind has been resolved.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRule {
    #[serde(default, deserialize_with = "scalar::string")]
    pub record: String,
    #[serde(default, deserialize_with = "scalar::string")]
    pub alert: String,
    #[serde(default, deserialize_with = "scalar::string")]
    pub expr: String,
    #[serde(rename = "for", default, deserialize_with = "scalar::optional_string")]
    pub for_duration: Option<String>,
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub labels: Labels,
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub annotations: Labels,
}

impl RawRule {
    /// Resolve the rule kind: a named recording rule without an alert name
    /// records, everything else alerts.
    fn resolve(self, path: &str) -> Result<Rule, ParseError> {
        if !self.record.is_empty() && self.alert.is_empty() {
            return Ok(Rule::Recording(RecordingRule {
                record: self.record,
                expr: self.expr,
                labels: self.labels,
            }));
        }
        let for_duration = match self.for_duration.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_duration(raw).map_err(|e| e.at(format!("{}.for", path)))?),
        };
        Ok(Rule::Alerting(AlertingRule {
            alert: self.alert,
            expr: self.expr,
            for_duration,
            labels: self.labels,
            annotations: self.annotations,
        }))
    }
}

impl RuleFile {
    /// Resolve every rule and produce the canonical project. `prefix` is the
    /// document path of the group list, used in error locations.
    pub fn into_project(self, prefix: &str) -> Result<RulesProject, ParseError> {
        let mut groups = Vec::with_capacity(self.groups.len());
        for (gi, raw) in self.groups.into_iter().enumerate() {
            let mut rules = Vec::with_capacity(raw.rules.len());
            for (ri, rule) in raw.rules.into_iter().enumerate() {
                rules.push(rule.resolve(&format!("{}[{}].rules[{}]", prefix, gi, ri))?);
            }
            groups.push(Group {
                name: raw.name,
                rules,
            });
        }
        Ok(RulesProject { groups })
    }
}

/// Parse a rule file into its canonical [`RulesProject`].
///
/// Top-level `groups` is tried first; when it is absent or empty the operator
/// envelope is tried and promoted.
pub fn parse_rules(input: &str) -> Result<Parsed<RulesProject>, ParseError> {
    let Some(value) = load_value(input)? else {
        return Ok(Parsed::Empty);
    };
    if !value.is_object() {
        return Err(ParseError::new(
            ParseErrorKind::TypeMismatch,
            "rule file root must be a YAML mapping",
        ));
    }

    let plain: RuleFile = from_value(value.clone())?;
    let (file, prefix) = if !plain.groups.is_empty() {
        (plain, "groups")
    } else {
        let envelope: OperatorEnvelope = from_value(value)?;
        (envelope.promote(), "spec.groups")
    };

    if file.groups.is_empty() {
        return Ok(Parsed::Empty);
    }
    file.into_project(prefix).map(Parsed::Project)
}

// ─── Job file wire shapes ───────────────────────────────────────────────────

/// A bare job list, the shape file-based job includes use.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct JobList {
    pub jobs: Vec<Job>,
}

/// A Prometheus server config carrying its jobs under `scrape_configs`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScrapeConfigEnvelope {
    #[serde(default, deserialize_with = "scalar::list")]
    pub scrape_configs: Vec<Job>,
}

impl ScrapeConfigEnvelope {
    pub fn promote(self) -> JobList {
        JobList {
            jobs: self.scrape_configs,
        }
    }
}

/// Parse a job file into its canonical [`JobsProject`].
pub fn parse_jobs(input: &str) -> Result<Parsed<JobsProject>, ParseError> {
    let Some(value) = load_value(input)? else {
        return Ok(Parsed::Empty);
    };

    let list: JobList = if value.is_array() {
        from_value(value)?
    } else if value.get("scrape_configs").is_some() {
        from_value::<ScrapeConfigEnvelope>(value)?.promote()
    } else {
        return Err(ParseError::new(
            ParseErrorKind::TypeMismatch,
            "job file must be a sequence of jobs or a mapping with scrape_configs",
        ));
    };

    if list.jobs.is_empty() {
        return Ok(Parsed::Empty);
    }
    Ok(Parsed::Project(JobsProject { jobs: list.jobs }))
}

// ─── Shared helpers ─────────────────────────────────────────────────────────

/// Read YAML text into a value. `None` means the document is empty.
///
/// Only the first document of a multi-document stream is read.
pub(crate) fn load_value(input: &str) -> Result<Option<Value>, ParseError> {
    let input = first_document(input);
    if is_blank_document(input) {
        return Ok(None);
    }

    let value: Value = serde_saphyr::from_str(input).map_err(|e| {
        let msg = e.to_string();
        ParseError::new(classify_error(&msg), msg)
    })?;

    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(value))
}

pub(crate) fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ParseError> {
    serde_json::from_value(value).map_err(|e| {
        let msg = e.to_string();
        ParseError::new(classify_error(&msg), msg)
    })
}

/// True when the text has no content besides whitespace, comments,
/// directives and document markers.
fn is_blank_document(input: &str) -> bool {
    input.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty()
            || trimmed.starts_with('#')
            || line.starts_with('%')
            || trimmed == "---"
            || trimmed == "..."
    })
}

/// Cut the text where the first document ends: after a `...` marker, or
/// before a `---` marker that follows document content or an earlier marker. Only `---` at column 0
/// counts, so block scalars are left alone. Directive lines (`%YAML`, `%TAG`)
/// belong to the document header, not its content.
fn first_document(input: &str) -> &str {
    let mut seen_content = false;
    let mut seen_start = false;
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        if is_document_start(body) {
            if seen_content || seen_start {
                tracing::warn!("Multi-document YAML, only the first document is linted");
                return &input[..offset];
            }
            seen_start = true;
        } else if body.trim_end() == "..." {
            return &input[..offset + line.len()];
        } else if !body.trim().is_empty()
            && !body.trim_start().starts_with('#')
            && !body.starts_with('%')
        {
            seen_content = true;
        }
        offset += line.len();
    }
    input
}

fn is_document_start(line: &str) -> bool {
    line.strip_prefix("---")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
}

fn classify_error(msg: &str) -> ParseErrorKind {
    let lower = msg.to_lowercase();
    if lower.contains("invalid duration") {
        ParseErrorKind::InvalidDuration
    } else if lower.contains("invalid type")
        || lower.contains("expected")
        || lower.contains("missing field")
    {
        ParseErrorKind::TypeMismatch
    } else {
        ParseErrorKind::Syntax
    }
}
