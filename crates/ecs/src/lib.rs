//! Amazon ECS adapter for podshift
//!
//! Reads and writes ECS task definitions (JSON).
//!
//! # Example
//!
//! ```ignore
//! use podshift_convert::{Emitter, Ingester};
//! use podshift_ecs::{EcsEmitter, EcsIngester};
//!
//! let group = EcsIngester::new().ingest_str(&json)?;
//! let output = EcsEmitter::new().with_indent(2).emit(&group)?;
//! ```
//!
//! # ECS to IR Mapping
//!
//! | ECS JSON | IR Field |
//! |----------|----------|
//! | `family` | `group.name` |
//! | `networkMode: host` | `group.host_network` |
//! | `pidMode: host` | `group.host_pid` |
//! | `tags` | `group.global_labels` |
//! | `memory` (MiB) | `container.memory` (bytes) |
//! | `command`, `entryPoint` | joined with single spaces |
//! | `mountPoints` + `volumes` | `container.volumes` via the named-volume registry |
//! | `volumesFrom` | `name[:ro]` strings |

pub mod emitter;
pub mod ingest;
pub mod schema;

pub use emitter::EcsEmitter;
pub use ingest::EcsIngester;

/// Format name for lookups and error messages.
pub const FORMAT: &str = "ecs";
