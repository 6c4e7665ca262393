//! Duration parser for configuration values and CLI arguments.
//!
//! Supported formats:
//! - Plain seconds: `1`, `30`
//! - Milliseconds: `500ms`
//! - Seconds: `1s`
//! - Minutes: `2m`
//! - Hours: `1h`

use std::time::Duration;

/// Error type for duration parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationParseError {
    pub input: String,
    pub message: String,
}

impl std::fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse duration '{}': {}", self.input, self.message)
    }
}

impl std::error::Error for DurationParseError {}

/// Parses a duration string such as `1s`, `500ms`, `2m`, `1h` or `30`.
///
/// A bare number is interpreted as seconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wgstat_core::util::parse_duration;
///
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// assert_eq!(parse_duration("2").unwrap(), Duration::from_secs(2));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let input = input.trim();
    let error = |message: &str| DurationParseError {
        input: input.to_string(),
        message: message.to_string(),
    };

    if input.is_empty() {
        return Err(error("empty duration string"));
    }

    // "ms" must be checked before "m" and "s".
    let (number_str, unit_millis): (&str, u64) = if let Some(n) = input.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = input.strip_suffix('s') {
        (n, 1_000)
    } else if let Some(n) = input.strip_suffix('m') {
        (n, 60_000)
    } else if let Some(n) = input.strip_suffix('h') {
        (n, 3_600_000)
    } else {
        (input, 1_000)
    };

    let number_str = number_str.trim();
    if number_str.is_empty() || !number_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(error(
            "Unrecognized format. Use: seconds (30), milliseconds (500ms), \
             seconds (1s), minutes (2m), or hours (1h)",
        ));
    }

    let number: u64 = number_str.parse().map_err(|_| error("number out of range"))?;
    let millis = number
        .checked_mul(unit_millis)
        .ok_or_else(|| error("duration overflow"))?;

    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_bare_seconds() {
        assert_eq!(parse_duration("30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration(" 5 ").unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_zero_is_accepted() {
        // Positivity is a config validation concern, not a parse error.
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("1.5s").is_err());
        assert!(parse_duration("10d").is_err());
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn test_parse_overflow() {
        let err = parse_duration("18446744073709551615h").unwrap_err();
        assert_eq!(err.message, "duration overflow");
    }

    #[test]
    fn test_error_display_includes_input() {
        let err = parse_duration("fast").unwrap_err();
        assert!(err.to_string().contains("'fast'"));
    }
}
