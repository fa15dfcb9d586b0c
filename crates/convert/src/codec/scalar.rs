//! Lenient scalar values.
//!
//! Native documents are loose about scalars: a port may be `8080` or `"8080"`,
//! a memory limit `536870912` or `"512m"`. Deserializing straight into a
//! number would turn a bad value into a whole-document parse failure with no
//! container context. [`Scalar`] never fails to deserialize; the adapter
//! converts it afterwards and reports a field-level error.

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::CodecError;

/// A scalar captured as written, or the kind of non-scalar found instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scalar {
    /// Non-negative integer
    Int(u64),
    /// Any other scalar rendered as text (strings, negative numbers, floats, booleans)
    Text(String),
    /// Explicit null
    #[default]
    Null,
    /// A sequence or mapping where a scalar was expected
    Unsupported(&'static str),
}

impl Scalar {
    /// Text form of the scalar; null renders as the empty string.
    ///
    /// # Errors
    /// Returns [`CodecError::UnsupportedShape`] for sequences and mappings.
    pub fn to_text(&self) -> Result<String, CodecError> {
        match self {
            Self::Int(n) => Ok(n.to_string()),
            Self::Text(s) => Ok(s.clone()),
            Self::Null => Ok(String::new()),
            Self::Unsupported(kind) => Err(CodecError::UnsupportedShape {
                expected: "a scalar",
                found: (*kind).to_string(),
            }),
        }
    }

    /// Parse as a non-negative integer no larger than `T::MAX`.
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidNumber`] for text that is not a number or
    /// is out of range, and [`CodecError::UnsupportedShape`] for non-scalars.
    pub fn to_number<T>(&self) -> Result<T, CodecError>
    where
        T: TryFrom<u64>,
    {
        let raw = match self {
            Self::Int(n) => *n,
            Self::Text(s) => parse_u64(s)?,
            Self::Null => {
                return Err(CodecError::InvalidNumber {
                    value: "null".to_string(),
                });
            }
            Self::Unsupported(kind) => {
                return Err(CodecError::UnsupportedShape {
                    expected: "a number",
                    found: (*kind).to_string(),
                });
            }
        };
        T::try_from(raw).map_err(|_| CodecError::InvalidNumber {
            value: raw.to_string(),
        })
    }
}

/// Parse a decimal, non-negative integer.
pub(crate) fn parse_u64(text: &str) -> Result<u64, CodecError> {
    text.trim().parse().map_err(|_| CodecError::InvalidNumber {
        value: text.to_string(),
    })
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(n) => serializer.serialize_u64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Null | Self::Unsupported(_) => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(u64::try_from(v).map_or_else(|_| Scalar::Text(v.to_string()), Scalar::Int))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(Scalar::Int(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Scalar, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Scalar, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Scalar::Unsupported("a sequence"))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Scalar, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Scalar::Unsupported("a mapping"))
    }
}
