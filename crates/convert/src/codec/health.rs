//! Health-check codec: Docker-style test arrays and duration strings.

use serde::Deserializer;

use super::command;
use super::shape::{Shape, decode_either};
use crate::error::CodecError;

/// Extract the exec command from a test array.
///
/// `["CMD-SHELL", "curl -f localhost"]` and `["CMD", "curl", "-f", "localhost"]`
/// both yield `curl -f localhost`. `["NONE"]` and an empty array disable the
/// check. An array without a leading keyword is treated as a plain command.
#[must_use]
pub fn exec_from_test<S: AsRef<str>>(test: &[S]) -> Option<String> {
    match test.split_first() {
        None => None,
        Some((head, _)) if head.as_ref() == "NONE" => None,
        Some((head, rest)) if head.as_ref() == "CMD-SHELL" || head.as_ref() == "CMD" => {
            command::join(rest)
        }
        Some(_) => command::join(test),
    }
}

/// Build a `CMD-SHELL` test array around a command.
#[must_use]
pub fn exec_to_test(command: &str) -> Vec<String> {
    vec!["CMD-SHELL".to_string(), command.to_string()]
}

/// Decode a test node that is either an array or a shell string.
///
/// # Errors
/// Returns [`CodecError::UnsupportedShape`] for any other shape.
pub fn decode_test<'de, D>(value: D) -> Result<Option<String>, CodecError>
where
    D: Deserializer<'de> + Clone,
{
    let shape = decode_either::<_, Vec<String>, String>(value).map_err(|e| {
        CodecError::UnsupportedShape {
            expected: "a test array or a shell command string",
            found: e.to_string(),
        }
    })?;

    match shape {
        Shape::Structured(test) => Ok(exec_from_test(&test)),
        Shape::Flat(shell) => Ok(Some(shell).filter(|s| !s.is_empty())),
    }
}

/// Parse a duration such as `30s`, `1m30s`, `1h` or `1500ms` into whole
/// seconds, rounding down. A bare integer is taken as seconds.
///
/// # Errors
/// Returns [`CodecError::InvalidDuration`] for an unknown unit, a malformed
/// number or more seconds than fit in a `u32`.
pub fn parse_duration(text: &str) -> Result<u32, CodecError> {
    let invalid = || CodecError::InvalidDuration {
        value: text.to_string(),
    };

    let trimmed = text.trim();
    if let Ok(seconds) = trimmed.parse::<u32>() {
        return Ok(seconds);
    }
    let duration = humantime::parse_duration(trimmed).map_err(|_| invalid())?;
    u32::try_from(duration.as_secs()).map_err(|_| invalid())
}

/// Render seconds as a duration string (`30s`).
#[must_use]
pub fn format_duration(seconds: u32) -> String {
    format!("{seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_from_test() {
        assert_eq!(
            exec_from_test(&["CMD-SHELL", "curl -f localhost"]).as_deref(),
            Some("curl -f localhost")
        );
        assert_eq!(
            exec_from_test(&["CMD", "curl", "-f", "localhost"]).as_deref(),
            Some("curl -f localhost")
        );
        assert_eq!(exec_from_test(&["NONE"]), None);
        assert_eq!(exec_from_test::<&str>(&[]), None);
        assert_eq!(exec_from_test(&["true"]).as_deref(), Some("true"));
    }

    #[test]
    fn test_exec_to_test() {
        assert_eq!(exec_to_test("pg_isready"), vec!["CMD-SHELL", "pg_isready"]);
    }

    #[test]
    fn test_decode_test_shapes() {
        let list: serde_yaml::Value = serde_yaml::from_str("[CMD, pg_isready]").unwrap();
        assert_eq!(decode_test(list).unwrap().as_deref(), Some("pg_isready"));

        let shell: serde_yaml::Value = serde_yaml::from_str("pg_isready -U app").unwrap();
        assert_eq!(decode_test(shell).unwrap().as_deref(), Some("pg_isready -U app"));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Ok(30));
        assert_eq!(parse_duration("1m30s"), Ok(90));
        assert_eq!(parse_duration("1h"), Ok(3600));
        assert_eq!(parse_duration("1500ms"), Ok(1));
        assert_eq!(parse_duration("45"), Ok(45));
        assert!(parse_duration("").is_err());
        assert_eq!(parse_duration(" 2m "), Ok(120));
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("10x").is_err());
        assert!(parse_duration("s10").is_err());
        assert!(parse_duration("200y").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30), "30s");
    }
}
