//! Union discrimination for fields with two native shapes.
//!
//! Several native fields accept either a structured shape or a flat one:
//! environment and labels (mapping or `key=value` list), build (object or
//! directory string), command (list or string). They are resolved the same
//! way everywhere: one attempt at the structured shape, then one attempt at
//! the flat shape, first success wins.

use serde::{Deserialize, Deserializer};

/// Which of the two shapes a value decoded as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape<S, F> {
    /// The preferred, structured shape
    Structured(S),
    /// The fallback, flat shape
    Flat(F),
}

/// Decode `value` as `S`, falling back to `F` only if `S` fails.
///
/// `value` is an already-parsed document node such as `serde_yaml::Value` or
/// `serde_json::Value`, which can be deserialized from more than once.
///
/// # Errors
/// Returns the fallback attempt's error when neither shape matches.
pub fn decode_either<'de, D, S, F>(value: D) -> Result<Shape<S, F>, D::Error>
where
    D: Deserializer<'de> + Clone,
    S: Deserialize<'de>,
    F: Deserialize<'de>,
{
    if let Ok(structured) = S::deserialize(value.clone()) {
        return Ok(Shape::Structured(structured));
    }
    F::deserialize(value).map(Shape::Flat)
}
