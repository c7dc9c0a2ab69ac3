//! Shared scalar primitives used by the parsers.

use crate::error::{ParseError, ParseErrorKind};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

// ─── parse_duration ─────────────────────────────────────────────────────────

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([0-9]+)y)?(?:([0-9]+)w)?(?:([0-9]+)d)?(?:([0-9]+)h)?(?:([0-9]+)m)?(?:([0-9]+)s)?(?:([0-9]+)ms)?$")
        .unwrap()
});

/// Milliseconds per unit, in the order the units must appear.
const UNITS: [(&str, u64); 7] = [
    ("y", 365 * 86_400_000),
    ("w", 7 * 86_400_000),
    ("d", 86_400_000),
    ("h", 3_600_000),
    ("m", 60_000),
    ("s", 1_000),
    ("ms", 1),
];

/// Parses a Prometheus duration string.
///
/// Accepted: `0`, `30s`, `5m`, `1h30m`, `2d`, `1w`, `1y`, `250ms`. Units must
/// appear at most once each, largest first.
pub fn parse_duration(input: &str) -> Result<Duration, ParseError> {
    if input.is_empty() {
        return Err(duration_error("empty duration string"));
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let caps = DURATION_RE
        .captures(input)
        .ok_or_else(|| duration_error(&format!("invalid duration: '{}'", input)))?;

    let mut total_ms: u64 = 0;
    for (i, (_, unit_ms)) in UNITS.iter().enumerate() {
        let Some(m) = caps.get(i + 1) else {
            continue;
        };
        let n: u64 = m
            .as_str()
            .parse()
            .map_err(|_| duration_error(&format!("duration value too large: '{}'", input)))?;
        total_ms = n
            .checked_mul(*unit_ms)
            .and_then(|ms| total_ms.checked_add(ms))
            .ok_or_else(|| duration_error(&format!("duration value too large: '{}'", input)))?;
    }

    Ok(Duration::from_millis(total_ms))
}

fn duration_error(message: &str) -> ParseError {
    ParseError::new(ParseErrorKind::InvalidDuration, message)
}
