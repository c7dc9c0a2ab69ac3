use promlint::config::{Config, JobsConfig};
use promlint::policy::{self, Policy};
use promlint::{Check, FileLinter, FileStatus, Finding, JobsLinter};
use std::path::Path;

fn policy_with(jobs: JobsConfig) -> Policy {
    let config = Config {
        jobs,
        ..Config::default()
    };
    policy::compile(&config).expect("policy should compile")
}

fn lint_files(policy: &Policy, files: &[(&str, &str)]) -> Vec<Vec<Finding>> {
    let mut linter = JobsLinter::new(&policy.jobs);
    files
        .iter()
        .map(|(name, yaml)| {
            linter
                .lint_source(Path::new(name), yaml)
                .expect("lint should succeed")
                .findings
        })
        .collect()
}

fn checks(findings: &[Finding]) -> Vec<Check> {
    findings.iter().map(|f| f.check).collect()
}

#[test]
fn duplicate_job_name_across_files_flags_second_file() {
    let policy = policy_with(JobsConfig::default());
    let a = r#"
- job_name: node
  static_configs:
    - targets: ["host-a:9100"]
"#;
    let b = r#"
- job_name: node
  static_configs:
    - targets: ["host-b:9100"]
"#;
    let results = lint_files(&policy, &[("a.yaml", a), ("b.yaml", b)]);
    assert!(results[0].is_empty());
    assert_eq!(checks(&results[1]), vec![Check::JobNameUnique]);
    assert_eq!(results[1][0].subject, "node");
    assert_eq!(results[1][0].message, "Job name must be unique");
}

#[test]
fn duplicate_target_with_same_metrics_path_is_flagged() {
    let policy = policy_with(JobsConfig::default());
    let a = r#"
- job_name: node
  metrics_path: /metrics
  static_configs:
    - targets: ["localhost:9100"]
"#;
    let b = r#"
- job_name: node-again
  metrics_path: /metrics
  static_configs:
    - targets: ["localhost:9100", "localhost:9200"]
"#;
    let results = lint_files(&policy, &[("a.yaml", a), ("b.yaml", b)]);
    assert!(results[0].is_empty());
    assert_eq!(checks(&results[1]), vec![Check::TargetUnique]);
    assert_eq!(
        results[1][0].message,
        "Job target must be unique, found duplicate of localhost:9100"
    );
}

#[test]
fn same_target_under_different_metrics_path_is_distinct() {
    let policy = policy_with(JobsConfig::default());
    let yaml = r#"
- job_name: node
  metrics_path: /metrics
  static_configs:
    - targets: ["localhost:9100"]
- job_name: node-probe
  metrics_path: /probe
  static_configs:
    - targets: ["localhost:9100"]
"#;
    let results = lint_files(&policy, &[("jobs.yaml", yaml)]);
    assert!(results[0].is_empty(), "got: {:?}", results[0]);
}

#[test]
fn uniqueness_checks_can_be_disabled() {
    let policy = policy_with(JobsConfig {
        unique_job_name: false,
        unique_target: false,
        require_target_labels: Vec::new(),
    });
    let yaml = r#"
- job_name: node
  static_configs:
    - targets: ["localhost:9100"]
- job_name: node
  static_configs:
    - targets: ["localhost:9100"]
"#;
    let results = lint_files(&policy, &[("jobs.yaml", yaml)]);
    assert!(results[0].is_empty());
}

#[test]
fn required_target_labels_are_checked_per_static_config() {
    let policy = policy_with(JobsConfig {
        require_target_labels: vec!["env".to_string()],
        ..JobsConfig::default()
    });
    let yaml = r#"
- job_name: node
  static_configs:
    - targets: ["host-a:9100"]
      labels:
        env: prod
    - targets: ["host-b:9100"]
      labels:
        env: ""
    - targets: ["host-c:9100"]
"#;
    let results = lint_files(&policy, &[("jobs.yaml", yaml)]);
    assert_eq!(
        checks(&results[0]),
        vec![Check::TargetLabelRequired, Check::TargetLabelRequired]
    );
    assert_eq!(
        results[0][0].message,
        "Target label 'env' is required and must be non-empty"
    );
}

#[test]
fn job_violations_are_grouped_under_one_subject() {
    let policy = policy_with(JobsConfig {
        require_target_labels: vec!["env".to_string()],
        ..JobsConfig::default()
    });
    let yaml = r#"
- static_configs:
    - targets: ["localhost:9100"]
- static_configs:
    - targets: ["localhost:9100"]
"#;
    let results = lint_files(&policy, &[("jobs.yaml", yaml)]);
    assert_eq!(
        checks(&results[0]),
        vec![
            Check::TargetLabelRequired,
            Check::JobNameUnique,
            Check::TargetUnique,
            Check::TargetLabelRequired,
        ]
    );
    assert!(results[0].iter().all(|f| f.subject == "(unnamed job)"));
}

#[test]
fn scrape_configs_envelope_is_linted_like_a_job_list() {
    let policy = policy_with(JobsConfig::default());
    let list = r#"
- job_name: node
  static_configs:
    - targets: ["localhost:9100"]
- job_name: node
  static_configs:
    - targets: ["localhost:9100"]
"#;
    let server = r#"
global:
  scrape_interval: 15s
scrape_configs:
  - job_name: node
    static_configs:
      - targets: ["localhost:9100"]
  - job_name: node
    static_configs:
      - targets: ["localhost:9100"]
"#;
    let a = lint_files(&policy, &[("jobs.yaml", list)]);
    let b = lint_files(&policy, &[("jobs.yaml", server)]);
    assert_eq!(a, b);
    assert_eq!(
        checks(&a[0]),
        vec![Check::JobNameUnique, Check::TargetUnique]
    );
}

#[test]
fn empty_job_list_is_skipped() {
    let policy = policy_with(JobsConfig::default());
    let mut linter = JobsLinter::new(&policy.jobs);
    for input in ["", "[]\n", "# nothing here\n"] {
        let report = linter.lint_source(Path::new("jobs.yaml"), input).unwrap();
        assert_eq!(report.status, FileStatus::Skipped, "input {:?}", input);
    }
}
