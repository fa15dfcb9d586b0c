//! Key/value codec for environment variables and labels.
//!
//! Native shapes are a mapping (`KEY: value`) or a list of `KEY=value`
//! strings where a bare `KEY` means an empty value. The mapping shape is
//! tried first.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::scalar::Scalar;
use super::shape::{Shape, decode_either};
use crate::error::CodecError;

/// Decode a mapping-or-list node into a key/value map.
///
/// Mapping values may be any scalar; null becomes the empty string.
///
/// # Errors
/// Returns [`CodecError::UnsupportedShape`] when the node is neither shape or
/// a mapping value is not a scalar.
pub fn decode<'de, D>(value: D) -> Result<BTreeMap<String, String>, CodecError>
where
    D: Deserializer<'de> + Clone,
{
    let shape = decode_either::<_, BTreeMap<String, Scalar>, Vec<String>>(value).map_err(|e| {
        CodecError::UnsupportedShape {
            expected: "a mapping or a list of KEY=value strings",
            found: e.to_string(),
        }
    })?;

    match shape {
        Shape::Structured(map) => map
            .into_iter()
            .map(|(key, value)| Ok((key, value.to_text()?)))
            .collect(),
        Shape::Flat(pairs) => Ok(from_pairs(&pairs)),
    }
}

/// A key/value node nested inside a larger native record (build args).
///
/// Variants are tried in declaration order, mapping first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPairs {
    /// `KEY: value` mapping
    Mapping(BTreeMap<String, Scalar>),
    /// `KEY=value` strings
    List(Vec<String>),
}

impl RawPairs {
    /// Resolve to a key/value map.
    ///
    /// # Errors
    /// Returns [`CodecError::UnsupportedShape`] for a non-scalar mapping value.
    pub fn into_map(self) -> Result<BTreeMap<String, String>, CodecError> {
        match self {
            Self::Mapping(map) => stringify_values(&map),
            Self::List(pairs) => Ok(from_pairs(&pairs)),
        }
    }
}

impl From<&BTreeMap<String, String>> for RawPairs {
    fn from(map: &BTreeMap<String, String>) -> Self {
        Self::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), Scalar::Text(v.clone())))
                .collect(),
        )
    }
}

/// Parse `KEY=value` strings. A bare `KEY` maps to the empty string and a
/// later duplicate key wins.
#[must_use]
pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|pair| match pair.as_ref().split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.as_ref().to_string(), String::new()),
        })
        .collect()
}

/// Render a map as `KEY=value` strings in ascending key order.
#[must_use]
pub fn to_pairs(map: &BTreeMap<String, String>) -> Vec<String> {
    map.iter().map(|(key, value)| format!("{key}={value}")).collect()
}

/// Stringify the scalar values of a native option map (log options, build args).
///
/// # Errors
/// Returns [`CodecError::UnsupportedShape`] for a non-scalar value.
pub fn stringify_values(map: &BTreeMap<String, Scalar>) -> Result<BTreeMap<String, String>, CodecError> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), value.to_text()?)))
        .collect()
}
