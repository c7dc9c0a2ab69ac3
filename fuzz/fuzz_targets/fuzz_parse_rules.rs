#![no_main]

use libfuzzer_sys::fuzz_target;
use promlint::parse::{Parsed, parse_rules};
use promlint::{Config, RulesLinter, policy};
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let project = match parse_rules(&s) {
        Ok(Parsed::Project(p)) => p,
        Ok(Parsed::Empty) | Err(_) => return,
    };

    if project.groups.is_empty() {
        panic!(
            "non-empty parse result without groups: {:?}",
            s.get(..200).unwrap_or(&s)
        );
    }

    let policy = match policy::compile(&Config::default()) {
        Ok(p) => p,
        Err(_) => return,
    };
    let _ = RulesLinter::new(&policy.rules).lint_project(Path::new("fuzz.yaml"), &project);
});
