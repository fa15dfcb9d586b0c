//! Kubernetes pod adapter for podshift
//!
//! Ingest only: a `Pod` manifest becomes a [`podshift_convert::PodGroup`].
//! There is no emitter for this format.
//!
//! # Pod to IR Mapping
//!
//! | Pod YAML | IR Field |
//! |----------|----------|
//! | `metadata.name` | `group.name` |
//! | `metadata.labels` | `group.global_labels` |
//! | `spec.hostNetwork`, `spec.hostPID` | `group.host_network`, `group.host_pid` |
//! | `spec.hostname` | `container.hostname` (every container) |
//! | `args` | `container.command` (joined) |
//! | `command` | `container.entrypoint` (joined) |
//! | `volumeMounts` | `container.volumes` via `spec.volumes[].hostPath` |
//! | `livenessProbe` | `container.health_checks` |
//! | `resources.limits.cpu` | `container.cpu_shares` (1 core = 1024) |
//! | `resources.limits.memory` | `container.memory` (bytes) |

pub mod ingest;
pub mod schema;

pub use ingest::KubeIngester;

/// Format name for lookups and error messages.
pub const FORMAT: &str = "k8s";
