//! Canonical container model and conversion contract for podshift
//!
//! Every supported workload format is translated through the intermediate
//! representation (IR) defined here. Format crates compose the field codecs in
//! [`codec`] to build or consume a [`PodGroup`], and plug into the
//! [`adapter::FormatRegistry`] through the [`Ingester`] and [`Emitter`] traits.
//!
//! ## Crate layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ir`] | `Container`, `PodGroup` and shared sub-records, group validation |
//! | [`codec`] | Symmetric converters between native field encodings and IR fields |
//! | [`ordering`] | The total order applied to every emitted collection |
//! | [`adapter`] | `Ingester`/`Emitter` traits and the format registry |
//! | [`error`] | Structural, field-decode and selection errors |

pub mod adapter;
pub mod codec;
pub mod error;
pub mod ir;
pub mod ordering;

pub use adapter::{
    Emitter, FormatInfo, FormatRegistry, FormatRegistryBuilder, Ingester, finish_ingest,
    read_document,
};
pub use error::{CodecError, Direction, Error, Result};
pub use ir::{
    BuildContext, Container, HealthCheck, HttpProbe, Logging, PodGroup, PortMapping, Probe,
    Protocol, Volume, validate_group,
};
pub use ordering::canonicalize;
