//! Command and argument-list codec.
//!
//! The IR keeps commands as one string joined with single spaces. Formats
//! that store argument lists split on single spaces when emitting. There is
//! no shell quoting, so arguments containing spaces do not survive a round
//! trip through a list-shaped format.

use serde::Deserializer;

use super::shape::{Shape, decode_either};
use crate::error::CodecError;

/// Join arguments with single spaces; an empty list is no command.
#[must_use]
pub fn join<S: AsRef<str>>(args: &[S]) -> Option<String> {
    if args.is_empty() {
        return None;
    }
    Some(
        args.iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Split a command on single spaces.
#[must_use]
pub fn split(command: &str) -> Vec<String> {
    command.split(' ').map(str::to_string).collect()
}

/// Decode a list-or-string command node into its joined form.
///
/// # Errors
/// Returns [`CodecError::UnsupportedShape`] for any other shape.
pub fn decode<'de, D>(value: D) -> Result<Option<String>, CodecError>
where
    D: Deserializer<'de> + Clone,
{
    match decode_strings(value, "a list of arguments or a command string")? {
        Shape::Structured(args) => Ok(join(&args)),
        Shape::Flat(command) => Ok(Some(command).filter(|c| !c.is_empty())),
    }
}

/// Decode a list-or-string node (`dns`, `env_file`) into a list, a single
/// string becoming a one-element list.
///
/// # Errors
/// Returns [`CodecError::UnsupportedShape`] for any other shape.
pub fn decode_list<'de, D>(value: D) -> Result<Vec<String>, CodecError>
where
    D: Deserializer<'de> + Clone,
{
    match decode_strings(value, "a string or a list of strings")? {
        Shape::Structured(items) => Ok(items),
        Shape::Flat(item) => Ok(vec![item]),
    }
}

fn decode_strings<'de, D>(value: D, expected: &'static str) -> Result<Shape<Vec<String>, String>, CodecError>
where
    D: Deserializer<'de> + Clone,
{
    decode_either(value).map_err(|e| CodecError::UnsupportedShape {
        expected,
        found: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_join_and_split() {
        assert_eq!(join(&["nginx", "-g", "daemon off;"]).as_deref(), Some("nginx -g daemon off;"));
        assert_eq!(join::<&str>(&[]), None);
        assert_eq!(split("nginx -g daemon off;"), vec!["nginx", "-g", "daemon", "off;"]);
    }

    #[test]
    fn test_split_keeps_empty_segments() {
        assert_eq!(split("a  b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_decode_command_shapes() {
        assert_eq!(decode(yaml("[sh, -c, 'echo hi']")).unwrap().as_deref(), Some("sh -c echo hi"));
        assert_eq!(decode(yaml("npm start")).unwrap().as_deref(), Some("npm start"));
        assert_eq!(decode(yaml("[]")).unwrap(), None);
        assert!(matches!(
            decode(yaml("{a: b}")),
            Err(CodecError::UnsupportedShape { .. })
        ));
    }

    #[test]
    fn test_decode_list_shapes() {
        assert_eq!(decode_list(yaml("8.8.8.8")).unwrap(), vec!["8.8.8.8"]);
        assert_eq!(decode_list(yaml("[8.8.8.8, 1.1.1.1]")).unwrap(), vec!["8.8.8.8", "1.1.1.1"]);
    }
}
