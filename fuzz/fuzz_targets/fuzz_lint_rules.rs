#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use promlint::config::{Config, KeyMatchConfig, RulesConfig};
use promlint::{AlertingRule, Group, Labels, Rule, RulesLinter, RulesProject, policy};
use std::path::Path;

#[derive(Arbitrary, Debug)]
struct Input {
    label_name: String,
    label_match: String,
    groups: Vec<(String, Vec<(String, String, Vec<(String, String)>)>)>,
}

fuzz_target!(|input: Input| {
    let config = Config {
        rules: RulesConfig {
            unique_group_name: true,
            match_rule_labels: vec![KeyMatchConfig {
                name: input.label_name,
                value: input.label_match,
            }],
            ..RulesConfig::default()
        },
        ..Config::default()
    };
    let policy = match policy::compile(&config) {
        Ok(p) => p,
        Err(_) => return,
    };

    let project = RulesProject {
        groups: input
            .groups
            .into_iter()
            .map(|(name, rules)| Group {
                name,
                rules: rules
                    .into_iter()
                    .map(|(alert, expr, labels)| {
                        Rule::Alerting(AlertingRule {
                            alert,
                            expr,
                            labels: labels.into_iter().collect::<Labels>(),
                            ..AlertingRule::default()
                        })
                    })
                    .collect(),
            })
            .collect(),
    };

    // Fresh linters start from the same state and must agree.
    let a = RulesLinter::new(&policy.rules).lint_project(Path::new("fuzz.yaml"), &project);
    let b = RulesLinter::new(&policy.rules).lint_project(Path::new("fuzz.yaml"), &project);
    assert_eq!(a, b);
});
