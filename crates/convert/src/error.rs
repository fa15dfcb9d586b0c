//! Error types for ingest and emit operations.

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a conversion a format name was looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Inbound format (ingest)
    Input,
    /// Outbound format (emit)
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Errors raised while ingesting or emitting a workload document.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The outer document does not parse against its schema.
    #[error("{format}: document could not be parsed: {message}")]
    #[diagnostic(
        code(podshift::structural),
        help("Check that the input is valid for the selected input format")
    )]
    Structural {
        /// Format name of the adapter that failed
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// A single field's native encoding matches none of its accepted shapes.
    #[error("{format}: container '{container}' has an invalid '{field}' field")]
    #[diagnostic(code(podshift::field_decode))]
    FieldDecode {
        /// Format name of the adapter that failed
        format: &'static str,
        /// Name of the offending container
        container: String,
        /// Native field name
        field: &'static str,
        /// Codec-level reason
        #[source]
        source: CodecError,
    },

    /// An input or output format name is not registered.
    #[error("unknown {direction} format '{name}'")]
    #[diagnostic(code(podshift::unknown_format), help("Available {direction} formats: {available}"))]
    UnknownFormat {
        /// Lookup side
        direction: Direction,
        /// Requested name
        name: String,
        /// Comma-separated registered names
        available: String,
    },

    /// Two containers in one group share a name.
    #[error("{format}: duplicate container name '{name}'")]
    #[diagnostic(
        code(podshift::duplicate_container),
        help("Container names must be unique within a pod, task or compose file")
    )]
    DuplicateContainer {
        /// Format name of the adapter that detected the collision
        format: &'static str,
        /// Colliding name
        name: String,
    },

    /// The native document could not be serialized.
    #[error("{format}: document could not be serialized: {message}")]
    #[diagnostic(code(podshift::serialization))]
    Serialization {
        /// Format name of the emitter that failed
        format: &'static str,
        /// Serializer message
        message: String,
    },

    /// Reading the input failed.
    #[error("I/O error: {0}")]
    #[diagnostic(code(podshift::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a structural parse error.
    pub fn structural(format: &'static str, message: impl fmt::Display) -> Self {
        Self::Structural {
            format,
            message: message.to_string(),
        }
    }

    /// Create a field-decode error for one container field.
    pub fn field(
        format: &'static str,
        container: impl Into<String>,
        field: &'static str,
        source: CodecError,
    ) -> Self {
        Self::FieldDecode {
            format,
            container: container.into(),
            field,
            source,
        }
    }

    /// Create a serialization error.
    pub fn serialization(format: &'static str, message: impl fmt::Display) -> Self {
        Self::Serialization {
            format,
            message: message.to_string(),
        }
    }

    /// Create an unknown-format selection error.
    pub fn unknown_format(direction: Direction, name: impl Into<String>, available: &[&str]) -> Self {
        Self::UnknownFormat {
            direction,
            name: name.into(),
            available: available.join(", "),
        }
    }
}

/// Reasons a single native field failed to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A numeric part is not a non-negative integer in range.
    #[error("'{value}' is not a valid number")]
    InvalidNumber {
        /// Offending text
        value: String,
    },

    /// A delimited string has the wrong number of parts.
    #[error("'{value}' has {found} ':'-separated parts, expected {expected}")]
    SegmentCount {
        /// Offending text
        value: String,
        /// Number of parts found
        found: usize,
        /// Human-readable accepted range
        expected: &'static str,
    },

    /// A required value is empty.
    #[error("value is empty")]
    Empty,

    /// The value has a shape none of the accepted shapes match.
    #[error("expected {expected}, found {found}")]
    UnsupportedShape {
        /// Accepted shapes
        expected: &'static str,
        /// What was found
        found: String,
    },

    /// A protocol other than tcp or udp.
    #[error("unknown protocol '{value}', expected tcp or udp")]
    UnknownProtocol {
        /// Offending text
        value: String,
    },

    /// A resource quantity or byte size that cannot be parsed.
    #[error("'{value}' is not a valid quantity")]
    InvalidQuantity {
        /// Offending text
        value: String,
    },

    /// A duration string that cannot be parsed.
    #[error("'{value}' is not a valid duration")]
    InvalidDuration {
        /// Offending text
        value: String,
    },

    /// A named port that the container does not declare.
    #[error("port name '{name}' is not declared by the container")]
    UnknownPortName {
        /// Referenced port name
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_names_container_and_field() {
        let err = Error::field(
            "compose",
            "web",
            "ports",
            CodecError::InvalidNumber {
                value: "abc".to_string(),
            },
        );

        let message = err.to_string();
        assert!(message.contains("compose"));
        assert!(message.contains("'web'"));
        assert!(message.contains("'ports'"));

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("'abc' is not a valid number"));
    }

    #[test]
    fn test_unknown_format_lists_available() {
        let err = Error::unknown_format(Direction::Output, "yaml", &["compose", "ecs"]);
        assert_eq!(err.to_string(), "unknown output format 'yaml'");

        let Error::UnknownFormat { available, .. } = err else {
            panic!("expected UnknownFormat");
        };
        assert_eq!(available, "compose, ecs");
    }
}
