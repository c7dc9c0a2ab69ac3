//! Shell-style glob expansion.
//!
//! Each pattern is split into a literal base directory and a glob tail. The
//! base is walked (no deeper than the tail needs unless it contains `**`) and
//! every regular file is tested against the compiled matcher. `*` and `?` do
//! not cross `/`. A brace without its partner is a literal character, as in
//! `filepath.Glob`.

use crate::error::LintError;
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const GLOB_META: &[char] = &['*', '?', '['];

fn has_glob_meta(s: &str) -> bool {
    s.contains(GLOB_META) || s.find('{').is_some_and(|open| s[open..].contains('}'))
}

/// Rewrite `{` with no later `}` and `}` with no earlier `{` as one-character
/// classes so the matcher reads them literally.
fn escape_lone_braces(pattern: &str) -> String {
    let first_open = pattern.find('{');
    let last_close = pattern.rfind('}');
    let mut out = String::with_capacity(pattern.len());
    let mut in_class = false;
    for (i, c) in pattern.char_indices() {
        match c {
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '{' if !in_class && last_close.is_none_or(|close| close < i) => {
                out.push_str("[{]");
                continue;
            }
            '}' if !in_class && first_open.is_none_or(|open| open > i) => {
                out.push_str("[}]");
                continue;
            }
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Expand `patterns` into an ordered file list.
///
/// Matches of each pattern are sorted; pattern results are concatenated in
/// argument order with later repeats of a file dropped. A pattern that matches
/// nothing is not an error. An invalid pattern is.
pub fn expand<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>, LintError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let matches = expand_pattern(pattern)?;
        if matches.is_empty() {
            tracing::warn!("Pattern '{}' did not match any file", pattern);
        }
        for path in matches {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

/// Expand a single pattern, sorted lexically.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, LintError> {
    if !has_glob_meta(pattern) {
        let path = PathBuf::from(pattern);
        return Ok(if path.is_file() { vec![path] } else { Vec::new() });
    }

    let matcher = compile(pattern)?;
    let (base, depth) = split_base(pattern);
    let root = if base.as_os_str().is_empty() {
        Path::new(".")
    } else {
        base.as_path()
    };
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
    if let Some(depth) = depth {
        walker = walker.max_depth(depth);
    }

    let mut matches = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("Skipping unreadable path while expanding '{}': {}", pattern, err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let candidate = if base.as_os_str().is_empty() {
            path.strip_prefix(".").unwrap_or(path)
        } else {
            path
        };
        if matcher.is_match(candidate) {
            matches.push(candidate.to_path_buf());
        }
    }
    matches.sort();
    Ok(matches)
}

fn compile(pattern: &str) -> Result<GlobMatcher, LintError> {
    GlobBuilder::new(&escape_lone_braces(pattern))
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| LintError::Glob {
            pattern: pattern.to_string(),
            source,
        })
}

/// Split a pattern into its literal leading directory and the walk depth the
/// rest needs (`None` when the rest contains `**`).
fn split_base(pattern: &str) -> (PathBuf, Option<usize>) {
    let parts: Vec<&str> = pattern.split('/').collect();
    let first_glob = parts
        .iter()
        .position(|p| has_glob_meta(p))
        .unwrap_or(parts.len());

    let mut base = parts[..first_glob].join("/");
    if base.is_empty() && pattern.starts_with('/') {
        base.push('/');
    }

    let tail = &parts[first_glob..];
    let depth = if tail.iter().any(|p| p.contains("**")) {
        None
    } else {
        Some(tail.len())
    };
    (PathBuf::from(base), depth)
}
