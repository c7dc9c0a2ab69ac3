#![no_main]

use libfuzzer_sys::fuzz_target;
use promlint::parse::{Parsed, parse_jobs};
use promlint::{Config, JobsLinter, policy};
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let project = match parse_jobs(&s) {
        Ok(Parsed::Project(p)) => p,
        Ok(Parsed::Empty) | Err(_) => return,
    };

    let policy = match policy::compile(&Config::default()) {
        Ok(p) => p,
        Err(_) => return,
    };
    let mut linter = JobsLinter::new(&policy.jobs);
    let first = linter.lint_project(Path::new("a.yaml"), &project);

    // The same jobs seen again in one run are all duplicates.
    let second = linter.lint_project(Path::new("b.yaml"), &project);
    if second.len() < first.len() {
        panic!(
            "second pass produced fewer findings ({} < {})",
            second.len(),
            first.len()
        );
    }
});
