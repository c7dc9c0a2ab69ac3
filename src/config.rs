//! Policy configuration: the YAML shape, built-in defaults, and discovery of
//! the configuration file.
//!
//! A domain section that is missing from the file gets the built-in defaults.
//! A section that is present is taken as written; fields it leaves out are
//! `false` or empty.

use crate::error::{ConfigError, ParseError};
use crate::parse::{from_value, load_value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILENAME: &str = ".prometheus-linter.yaml";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "PROM_LINTER_CONFIG";

/// Full policy configuration for both domains.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct Config {
    pub rules: RulesConfig,
    pub jobs: JobsConfig,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    rules: Option<RulesConfig>,
    #[serde(default)]
    jobs: Option<JobsConfig>,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Config {
            rules: file.rules.unwrap_or_default(),
            jobs: file.jobs.unwrap_or_default(),
        }
    }
}

/// Policy for rule-group files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default, rename = "groupPerFile")]
    pub one_group_per_file: bool,
    #[serde(default)]
    pub match_group_name: String,
    #[serde(default, rename = "matchRuleAlertName")]
    pub match_rule_alert: String,
    #[serde(default)]
    pub require_group_name: bool,
    #[serde(default)]
    pub unique_group_name: bool,
    #[serde(default)]
    pub require_group_rules: bool,
    #[serde(default, rename = "requireRuleAlertName")]
    pub require_rule_alert: bool,
    #[serde(default)]
    pub require_rule_expr: bool,
    #[serde(default)]
    pub require_rule_labels: Vec<String>,
    #[serde(default)]
    pub require_rule_annotations: Vec<String>,
    #[serde(default)]
    pub match_rule_labels: Vec<KeyMatchConfig>,
    #[serde(default)]
    pub match_rule_annotations: Vec<KeyMatchConfig>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            one_group_per_file: false,
            match_group_name: "^([a-zA-Z0-9]+)$".to_string(),
            match_rule_alert: "^([a-zA-Z0-9]+)$".to_string(),
            require_group_name: true,
            unique_group_name: false,
            require_group_rules: true,
            require_rule_alert: true,
            require_rule_expr: true,
            require_rule_labels: vec!["severity".to_string()],
            require_rule_annotations: Vec::new(),
            match_rule_labels: Vec::new(),
            match_rule_annotations: Vec::new(),
        }
    }
}

/// A value constraint applied to every key whose name matches `name`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyMatchConfig {
    /// Regex selecting the keys this constraint applies to.
    pub name: String,
    /// Regex the value of every selected key must match.
    #[serde(rename = "match")]
    pub value: String,
}

/// Policy for scrape job files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobsConfig {
    #[serde(default)]
    pub unique_job_name: bool,
    #[serde(default)]
    pub unique_target: bool,
    #[serde(default)]
    pub require_target_labels: Vec<String>,
}

impl Default for JobsConfig {
    fn default() -> Self {
        JobsConfig {
            unique_job_name: true,
            unique_target: true,
            require_target_labels: Vec::new(),
        }
    }
}

impl Config {
    /// Parse configuration from YAML text. Blank input yields the defaults.
    pub fn from_yaml(input: &str) -> Result<Config, ParseError> {
        match load_value(input)? {
            Some(value) => from_value(value),
            None => Ok(Config::default()),
        }
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_yaml(&input).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the configuration a [`ConfigSource`] points at.
    pub fn load(source: &ConfigSource) -> Result<Config, ConfigError> {
        match source.path() {
            Some(path) => Config::from_file(path),
            None => {
                tracing::warn!("No configuration file found, using built-in defaults");
                Ok(Config::default())
            }
        }
    }
}

// ─── Discovery ──────────────────────────────────────────────────────────────

/// Where the configuration came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config-file` on the command line.
    Flag(PathBuf),
    /// The `PROM_LINTER_CONFIG` environment variable.
    Env(PathBuf),
    /// `.prometheus-linter.yaml` in the working directory.
    WorkingDir(PathBuf),
    BuiltIn,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Flag(p) | ConfigSource::Env(p) | ConfigSource::WorkingDir(p) => Some(p),
            ConfigSource::BuiltIn => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => f.write_str("(built-in defaults)"),
        }
    }
}

/// Resolve the configuration file: explicit flag, then the environment
/// variable, then the default file in `cwd` if it exists.
///
/// Flag and environment paths are returned whether or not they exist, so a
/// typo surfaces as a read error instead of silently falling back.
pub fn discover(flag: Option<&Path>, env: Option<&str>, cwd: &Path) -> ConfigSource {
    if let Some(path) = flag
        && !path.as_os_str().is_empty()
    {
        return ConfigSource::Flag(path.to_path_buf());
    }
    if let Some(value) = env
        && !value.is_empty()
    {
        return ConfigSource::Env(PathBuf::from(value));
    }
    let default = cwd.join(DEFAULT_CONFIG_FILENAME);
    if default.is_file() {
        return ConfigSource::WorkingDir(default);
    }
    ConfigSource::BuiltIn
}
