use promlint::parse::{OperatorEnvelope, Parsed, RuleFile, parse_jobs, parse_rules};
use promlint::{ParseErrorKind, Rule};
use serde_json::json;
use std::time::Duration;

fn rules_project(input: &str) -> promlint::RulesProject {
    parse_rules(input)
        .expect("parse should succeed")
        .project()
        .expect("document should not be empty")
}

#[test]
fn flat_rule_file_resolves_rule_kinds() {
    let yaml = r#"
groups:
  - name: node
    interval: 30s
    rules:
      - record: job:up:sum
        expr: sum by (job) (up)
      - alert: NodeDown
        expr: up == 0
        for: 5m
        labels:
          severity: critical
        annotations:
          summary: Node is down
"#;
    let project = rules_project(yaml);
    assert_eq!(project.groups.len(), 1);
    let rules = &project.groups[0].rules;
    assert_eq!(rules.len(), 2);
    assert!(rules[0].is_recording());
    match &rules[1] {
        Rule::Alerting(alert) => {
            assert_eq!(alert.alert, "NodeDown");
            assert_eq!(alert.for_duration, Some(Duration::from_secs(300)));
            assert_eq!(alert.labels["severity"], "critical");
            assert_eq!(alert.annotations["summary"], "Node is down");
        }
        other => panic!("expected alerting rule, got {:?}", other),
    }
}

#[test]
fn rule_with_record_and_alert_is_alerting() {
    let yaml = r#"
groups:
  - name: node
    rules:
      - record: job:up:sum
        alert: NodeDown
        expr: up == 0
"#;
    let project = rules_project(yaml);
    assert!(!project.groups[0].rules[0].is_recording());
}

#[test]
fn operator_envelope_is_promoted() {
    let flat = r#"
groups:
  - name: kube
    rules:
      - alert: PodCrashLooping
        expr: rate(kube_pod_container_status_restarts_total[5m]) > 0
"#;
    let wrapped = r#"
apiVersion: monitoring.coreos.com/v1
kind: PrometheusRule
metadata:
  name: kube-rules
spec:
  groups:
    - name: kube
      rules:
        - alert: PodCrashLooping
          expr: rate(kube_pod_container_status_restarts_total[5m]) > 0
"#;
    assert_eq!(rules_project(flat), rules_project(wrapped));
}

#[test]
fn promote_lifts_spec_groups() {
    let envelope: OperatorEnvelope = serde_json::from_value(json!({
        "apiVersion": "monitoring.coreos.com/v1",
        "spec": { "groups": [ { "name": "a" }, { "name": "b" } ] }
    }))
    .unwrap();
    let file: RuleFile = envelope.promote();
    let names: Vec<_> = file.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);

    let missing: OperatorEnvelope = serde_json::from_value(json!({ "kind": "x" })).unwrap();
    assert!(missing.promote().groups.is_empty());
}

#[test]
fn top_level_groups_take_precedence_over_envelope() {
    let yaml = r#"
groups:
  - name: top
spec:
  groups:
    - name: nested
"#;
    let project = rules_project(yaml);
    assert_eq!(project.groups.len(), 1);
    assert_eq!(project.groups[0].name, "top");
}

#[test]
fn documents_without_groups_are_empty() {
    for input in [
        "",
        "   \n\n",
        "# only a comment\n",
        "---\n",
        "groups: []\n",
        "spec:\n  groups: []\n",
    ] {
        let parsed = parse_rules(input).expect("empty documents are not errors");
        assert!(parsed.is_empty(), "input {:?} should be empty", input);
    }
}

#[test]
fn leading_document_marker_is_accepted() {
    let yaml = "---\ngroups:\n  - name: a\n";
    assert_eq!(rules_project(yaml).groups[0].name, "a");
}

#[test]
fn only_the_first_document_is_read() {
    let yaml = "groups:\n  - name: a\n---\ngroups:\n  - name: b\n";
    let project = rules_project(yaml);
    assert_eq!(project.groups.len(), 1);
    assert_eq!(project.groups[0].name, "a");

    let ended = "groups:\n  - name: a\n...\n---\ngroups:\n  - name: b\n";
    assert_eq!(rules_project(ended), project);
}

#[test]
fn operator_manifest_stream_reads_first_resource() {
    let yaml = r#"---
apiVersion: monitoring.coreos.com/v1
kind: PrometheusRule
spec:
  groups:
    - name: first
---
apiVersion: monitoring.coreos.com/v1
kind: PrometheusRule
spec:
  groups:
    - name: second
"#;
    let project = rules_project(yaml);
    assert_eq!(project.groups.len(), 1);
    assert_eq!(project.groups[0].name, "first");
}

#[test]
fn empty_first_document_is_empty() {
    let parsed = parse_rules("---\n---\ngroups:\n  - name: b\n").unwrap();
    assert!(parsed.is_empty());
}

#[test]
fn yaml_directive_before_document_marker_is_accepted() {
    let yaml = "%YAML 1.2\n---\ngroups:\n  - name: a\n    rules:\n      - alert: A\n        expr: up\n";
    let project = rules_project(yaml);
    assert_eq!(project.groups[0].name, "a");
    assert_eq!(project.groups[0].rules[0].expr(), "up");

    assert!(parse_jobs("%YAML 1.2\n---\n").unwrap().is_empty());
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    assert!(parse_rules("groups: [\n  - name: a\n").is_err());
}

#[test]
fn non_mapping_root_is_a_type_mismatch() {
    let err = parse_rules("- name: a\n- name: b\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TypeMismatch);
}

#[test]
fn wrongly_typed_groups_is_an_error() {
    assert!(parse_rules("groups: not-a-list\n").is_err());
}

#[test]
fn invalid_for_duration_names_the_field() {
    let yaml = r#"
groups:
  - name: node
    rules:
      - alert: NodeDown
        expr: up == 0
        for: soon
"#;
    let err = parse_rules(yaml).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidDuration);
    assert_eq!(err.path.as_deref(), Some("groups[0].rules[0].for"));
}

#[test]
fn scalar_label_values_are_read_as_strings() {
    let yaml = r#"
groups:
  - name: node
    rules:
      - alert: NodeDown
        expr: up == 0
        labels:
          priority: 1
          paging: true
          owner:
"#;
    let project = rules_project(yaml);
    let Rule::Alerting(alert) = &project.groups[0].rules[0] else {
        panic!("expected alerting rule");
    };
    assert_eq!(alert.labels["priority"], "1");
    assert_eq!(alert.labels["paging"], "true");
    assert_eq!(alert.labels["owner"], "");
}

// ─── Jobs ───────────────────────────────────────────────────────────────────

#[test]
fn job_list_parses_targets_and_labels() {
    let yaml = r#"
- job_name: node
  metrics_path: /metrics
  scrape_interval: 15s
  static_configs:
    - targets: ["host-a:9100", "host-b:9100"]
      labels:
        env: prod
    - targets: ["host-c:9100"]
"#;
    let project = parse_jobs(yaml).unwrap().project().unwrap();
    assert_eq!(project.jobs.len(), 1);
    let job = &project.jobs[0];
    assert_eq!(job.name, "node");
    assert_eq!(job.metrics_path, "/metrics");
    assert_eq!(job.static_configs.len(), 2);
    assert_eq!(job.static_configs[0].targets, vec!["host-a:9100", "host-b:9100"]);
    assert_eq!(job.static_configs[0].labels["env"], "prod");
    assert!(job.static_configs[1].labels.is_empty());
}

#[test]
fn scrape_configs_envelope_is_promoted() {
    let list = "- job_name: node\n  static_configs:\n    - targets: [\"a:1\"]\n";
    let server = "scrape_configs:\n  - job_name: node\n    static_configs:\n      - targets: [\"a:1\"]\n";
    assert_eq!(parse_jobs(list).unwrap(), parse_jobs(server).unwrap());
}

#[test]
fn job_file_with_unexpected_root_is_rejected() {
    let err = parse_jobs("job_name: node\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TypeMismatch);
}

#[test]
fn null_static_configs_is_empty() {
    let project = parse_jobs("- job_name: node\n  static_configs:\n").unwrap();
    assert!(matches!(project, Parsed::Project(p) if p.jobs[0].static_configs.is_empty()));
}
