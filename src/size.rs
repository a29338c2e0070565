//! Human-scaled size encoding and decoding.
//!
//! File sizes are persisted in the store as compact human-scaled strings
//! (`"12M"`, `"3G"`) rather than raw byte counts. This module owns the unit
//! table and the conversions in both directions.
//!
//! Encoding truncates to an integer magnitude, so the round-trip is lossy by
//! design: `decode(encode(1536)) == 2048`. Callers that need a size threshold
//! must compare at the encoded granularity.
//!
//! # Example
//!
//! ```
//! use hashdex::size;
//!
//! assert_eq!(size::encode(1023), "1023B");
//! assert_eq!(size::encode(1024), "1K");
//! assert_eq!(size::decode("2K").unwrap(), 2048);
//! assert_eq!(size::decode("4096").unwrap(), 4096);
//! ```

use thiserror::Error;

/// Unit table shared by [`encode`] and [`decode`].
///
/// Powers of 1024, capped at petabytes: values that would scale past `P`
/// are still reported in `P`.
pub const UNITS: &[(char, u64)] = &[
    ('B', 1),
    ('K', 1 << 10),
    ('M', 1 << 20),
    ('G', 1 << 30),
    ('T', 1 << 40),
    ('P', 1 << 50),
];

/// Errors from parsing an encoded size string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SizeError {
    /// The input string was empty.
    #[error("size string is empty")]
    Empty,

    /// The input string was not a recognized size.
    #[error("invalid size: '{0}'")]
    Invalid(String),
}

/// Encode a byte count as a human-scaled string with zero decimal places.
///
/// Scales by repeatedly dividing by 1024 until the value drops below 1024,
/// then formats with the matching unit letter. Formatting uses standard
/// float rounding, so `encode(1536)` is `"2K"`, not `"1K"`.
#[must_use]
pub fn encode(bytes: u64) -> String {
    let mut value = bytes as f64;
    for &(unit, _) in &UNITS[..UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{value:.0}{unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.0}P")
}

/// Decode an encoded size string back to a byte count.
///
/// The trailing character is matched case-insensitively against the unit
/// table; the numeric prefix may be fractional (`"1.5G"`) and the product is
/// truncated to an integer. A string with no recognized trailing unit is
/// parsed as a raw integer byte count.
///
/// # Errors
///
/// Returns [`SizeError`] for empty input, a malformed or negative numeric
/// prefix, or a raw value that is not a non-negative integer.
pub fn decode(s: &str) -> Result<u64, SizeError> {
    let upper = s.trim().to_ascii_uppercase();
    let Some(last) = upper.chars().last() else {
        return Err(SizeError::Empty);
    };

    let Some(&(_, multiplier)) = UNITS.iter().find(|(unit, _)| *unit == last) else {
        return upper
            .parse::<u64>()
            .map_err(|_| SizeError::Invalid(s.to_string()));
    };

    // Unit letters are ASCII, so the byte split below the last char is safe.
    let prefix = &upper[..upper.len() - 1];
    let value: f64 = prefix
        .parse()
        .map_err(|_| SizeError::Invalid(s.to_string()))?;
    if value < 0.0 {
        return Err(SizeError::Invalid(s.to_string()));
    }

    Ok((value * multiplier as f64) as u64)
}
