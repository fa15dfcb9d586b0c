//! Docker Compose adapter for podshift
//!
//! Reads and writes compose files (`docker-compose.yaml`).
//!
//! # Example
//!
//! ```ignore
//! use podshift_compose::{ComposeEmitter, ComposeIngester};
//! use podshift_convert::{Emitter, Ingester};
//!
//! let group = ComposeIngester::new().ingest_str(&yaml)?;
//! let output = ComposeEmitter::new().with_version("2").emit(&group)?;
//! ```
//!
//! # Compose to IR Mapping
//!
//! | Compose YAML | IR Field |
//! |--------------|----------|
//! | service key | `container.name` |
//! | `environment`, `labels` | mapping or `KEY=value` list |
//! | `build` | object or directory string |
//! | `command`, `entrypoint` | list or string, joined with spaces |
//! | `mem_limit` | bytes or size string (`512m`) |
//! | `ports` | `[ip:][host:]container[/udp]` strings or integers |
//! | `volumes` | `[host:]container[:ro]` strings |
//! | `healthcheck` | exec health check |

pub mod emitter;
pub mod ingest;
pub mod schema;

pub use emitter::ComposeEmitter;
pub use ingest::ComposeIngester;

/// Format name for lookups and error messages.
pub const FORMAT: &str = "compose";
