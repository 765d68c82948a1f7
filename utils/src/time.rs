//! Duration parsing and formatting for the command line.

use thiserror::Error;

const UNITS: [(char, u64); 5] = [('w', 604_800), ('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("duration {0:?} overflows")]
    Overflow(String),
}

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Parse `"90"`, `"45m"`, `"1h30m"` or `"2w 3d"` into seconds.
///
/// A bare number is seconds. Units may repeat and appear in any order.
pub fn parse_duration(input: &str) -> Result<u64, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(secs);
    }

    let invalid = || DurationError::Invalid(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());
    let mut total: u64 = 0;
    let mut digits = String::new();
    for c in trimmed.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let (_, scale) = UNITS.iter().find(|(u, _)| *u == c).ok_or_else(invalid)?;
        let value: u64 = digits.parse().map_err(|_| invalid())?;
        let part = value.checked_mul(*scale).ok_or_else(overflow)?;
        total = total.checked_add(part).ok_or_else(overflow)?;
        digits.clear();
    }
    if !digits.is_empty() {
        return Err(invalid());
    }
    Ok(total)
}
