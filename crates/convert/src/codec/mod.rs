//! Field codecs
//!
//! Pure, symmetric converters between a format's native field encoding and
//! the IR's typed sub-records. Every codec returns [`CodecError`] on malformed
//! input; adapters attach the container and field name.
//!
//! | Codec | Native shape | IR field |
//! |-------|--------------|----------|
//! | [`port`] | `"[ip:][host:]container[/udp]"` | [`PortMapping`](crate::PortMapping) |
//! | [`volume`] | `"[host:]container[:ro]"`, named registry | [`Volume`](crate::Volume) |
//! | [`kv`] | mapping or `key=value` list | `BTreeMap<String, String>` |
//! | [`build`] | object or bare directory | [`BuildContext`](crate::BuildContext) |
//! | [`command`] | argument list or string | shell-joined string |
//! | [`resources`] | megabytes, byte sizes, quantities | bytes, CPU shares |
//! | [`health`] | test arrays, durations | [`HealthCheck`](crate::HealthCheck) |
//!
//! [`shape`] holds the union-discrimination rule shared by the codecs that
//! accept more than one native shape, and [`scalar`] the lenient scalar type
//! used to defer number parsing until the container is known.
//!
//! [`CodecError`]: crate::CodecError

pub mod build;
pub mod command;
pub mod health;
pub mod kv;
pub mod port;
pub mod resources;
pub mod scalar;
pub mod shape;
pub mod volume;

pub use scalar::Scalar;
pub use shape::{Shape, decode_either};
