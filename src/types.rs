use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Label or annotation key/value pairs, iterated in key order.
pub type Labels = BTreeMap<String, String>;

// ─── Rule groups ────────────────────────────────────────────────────────────

/// Canonical form of a rule file, whichever shape it arrived in.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RulesProject {
    pub groups: Vec<Group>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Group {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str("(unnamed group)")
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A rule inside a group. The kind is decided once, at parse time.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rule {
    Recording(RecordingRule),
    Alerting(AlertingRule),
}

impl Rule {
    pub fn expr(&self) -> &str {
        match self {
            Rule::Recording(r) => &r.expr,
            Rule::Alerting(a) => &a.expr,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Rule::Recording(_))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Recording(r) if r.record.is_empty() => f.write_str("(unnamed rule)"),
            Rule::Recording(r) => f.write_str(&r.record),
            Rule::Alerting(a) if a.alert.is_empty() => f.write_str("(unnamed alert)"),
            Rule::Alerting(a) => f.write_str(&a.alert),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RecordingRule {
    pub record: String,
    pub expr: String,
    pub labels: Labels,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AlertingRule {
    pub alert: String,
    pub expr: String,
    #[serde(rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<Duration>,
    pub labels: Labels,
    pub annotations: Labels,
}

// ─── Scrape jobs ────────────────────────────────────────────────────────────

/// Canonical form of a job file.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct JobsProject {
    pub jobs: Vec<Job>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "job_name", default, deserialize_with = "scalar::string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar::string")]
    pub metrics_path: String,
    #[serde(default, deserialize_with = "scalar::list")]
    pub static_configs: Vec<StaticTarget>,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str("(unnamed job)")
        } else {
            f.write_str(&self.name)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticTarget {
    #[serde(default, deserialize_with = "scalar::string_list")]
    pub targets: Vec<String>,
    #[serde(default, deserialize_with = "scalar::string_map")]
    pub labels: Labels,
}

// ─── Lenient scalar decoding ────────────────────────────────────────────────

/// Deserializers that read YAML scalars the way hand-written Prometheus files
/// use them: numbers and booleans become their string form, `null` becomes
/// empty.
pub(crate) mod scalar {
    use serde::de::{Deserialize, DeserializeOwned, Deserializer, Error};
    use serde_json::Value;
    use std::collections::BTreeMap;

    fn to_string<E: Error>(value: Value) -> Result<String, E> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(E::custom(format!("expected a scalar, got {}", other))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        to_string(Value::deserialize(deserializer)?)
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            other => to_string(other).map(Some),
        }
    }

    pub fn string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items.into_iter().map(to_string).collect(),
            other => Err(D::Error::custom(format!("expected a list, got {}", other))),
        }
    }

    pub fn string_map<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(BTreeMap::new()),
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| to_string(v).map(|v| (k, v)))
                .collect(),
            other => Err(D::Error::custom(format!("expected a mapping, got {}", other))),
        }
    }

    /// A sequence of structs where `null` stands for an empty list.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            other => serde_json::from_value(other).map_err(D::Error::custom),
        }
    }
}
