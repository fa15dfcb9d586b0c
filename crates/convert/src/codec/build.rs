//! Build-context codec.
//!
//! A build is either an object with `context`, `dockerfile` and `args`, or a
//! bare string naming the build directory.

use serde::{Deserialize, Deserializer, Serialize};

use super::kv::RawPairs;
use super::shape::{Shape, decode_either};
use crate::error::CodecError;
use crate::ir::BuildContext;

/// Structured build object as written in a native document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawBuild {
    /// Build directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Dockerfile override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,

    /// Build arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<RawPairs>,
}

/// Decode a build node: structured object first, directory string second.
///
/// # Errors
/// Returns [`CodecError::UnsupportedShape`] when the node is neither shape,
/// or an argument value is not a scalar.
pub fn decode<'de, D>(value: D) -> Result<BuildContext, CodecError>
where
    D: Deserializer<'de> + Clone,
{
    let shape = decode_either::<_, RawBuild, String>(value).map_err(|e| {
        CodecError::UnsupportedShape {
            expected: "a build object or a directory string",
            found: e.to_string(),
        }
    })?;

    match shape {
        Shape::Structured(raw) => Ok(BuildContext {
            context: raw.context.unwrap_or_default(),
            dockerfile: raw.dockerfile,
            args: raw.args.map(RawPairs::into_map).transpose()?.unwrap_or_default(),
        }),
        Shape::Flat(context) => Ok(BuildContext {
            context,
            ..BuildContext::default()
        }),
    }
}

/// Encode a build context as a structured object with mapping-shaped args.
#[must_use]
pub fn encode(build: &BuildContext) -> RawBuild {
    RawBuild {
        context: Some(build.context.clone()).filter(|c| !c.is_empty()),
        dockerfile: build.dockerfile.clone(),
        args: (!build.args.is_empty()).then(|| RawPairs::from(&build.args)),
    }
}
