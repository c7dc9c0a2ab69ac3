use promlint::config::{Config, KeyMatchConfig, RulesConfig};
use promlint::policy::{self, KeyMatch};
use promlint::{AlertingRule, Check, Group, Labels, Rule, RulesLinter, RulesProject};
use proptest::prelude::*;
use std::path::Path;

fn severity_match() -> KeyMatchConfig {
    KeyMatchConfig {
        name: "^sev_".to_string(),
        value: "^(critical|warning)$".to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn unselected_keys_never_violate(key in "[a-r][a-z_]{0,10}", value in "\\PC{0,20}") {
        let km = KeyMatch::compile(&severity_match(), "rules.matchRuleLabels[0]").unwrap();
        prop_assert!(!km.applies_to(&key));
        prop_assert!(km.matches(&key, &value));
    }

    #[test]
    fn selected_key_violates_iff_value_mismatches(
        suffix in "[a-z]{0,8}",
        value in prop_oneof![
            Just("critical".to_string()),
            Just("warning".to_string()),
            "[a-z]{0,10}",
        ],
    ) {
        let km = KeyMatch::compile(&severity_match(), "rules.matchRuleLabels[0]").unwrap();
        let key = format!("sev_{}", suffix);
        let ok = value == "critical" || value == "warning";
        prop_assert!(km.applies_to(&key));
        prop_assert_eq!(km.matches(&key, &value), ok);
    }

    #[test]
    fn one_finding_per_offending_label(
        good in prop::collection::btree_set("[a-z]{1,6}", 0..5),
        bad in prop::collection::btree_set("[a-z]{1,6}", 0..5),
    ) {
        let config = Config {
            rules: RulesConfig {
                match_rule_labels: vec![severity_match()],
                ..RulesConfig::default()
            },
            ..Config::default()
        };
        let policy = policy::compile(&config).unwrap();

        let mut labels = Labels::new();
        labels.insert("severity".to_string(), "critical".to_string());
        for key in &good {
            labels.insert(format!("sev_{}", key), "warning".to_string());
        }
        for key in &bad {
            labels.insert(format!("sev_x{}", key), "info".to_string());
        }

        let project = RulesProject {
            groups: vec![Group {
                name: "node".to_string(),
                rules: vec![Rule::Alerting(AlertingRule {
                    alert: "NodeDown".to_string(),
                    expr: "up == 0".to_string(),
                    labels,
                    ..AlertingRule::default()
                })],
            }],
        };

        let mut linter = RulesLinter::new(&policy.rules);
        let findings = linter.lint_project(Path::new("rules.yaml"), &project);
        prop_assert_eq!(findings.len(), bad.len());
        prop_assert!(findings.iter().all(|f| f.check == Check::LabelMatch));
    }
}
