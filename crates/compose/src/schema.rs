//! Docker Compose Schema Types
//!
//! Native shapes of a compose file. Fields that compose accepts in more than
//! one shape are kept as raw YAML nodes and resolved by the codecs in
//! `podshift_convert::codec`; numeric fields use the lenient [`Scalar`].
//! See: <https://docs.docker.com/compose/compose-file/>

use podshift_convert::codec::Scalar;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// A compose file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeFile {
    /// Schema version (`"2"`, `"3.8"`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Scalar>,

    /// Services keyed by name
    #[serde(default)]
    pub services: BTreeMap<String, Service>,
}

/// A single service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Service {
    /// Build context: object or directory string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Value>,

    /// Command: list or string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Value>,

    /// Relative CPU weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_shares: Option<Scalar>,

    /// DNS servers: list or string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<Value>,

    /// DNS search domains: list or string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_search: Option<Value>,

    /// Entrypoint: list or string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Value>,

    /// Environment files: list or string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<Value>,

    /// Environment: mapping or `KEY=value` list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Value>,

    /// Ports exposed to linked services only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expose: Vec<Scalar>,

    /// Health check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<Healthcheck>,

    /// Container hostname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Labels: mapping or `KEY=value` list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Value>,

    /// Links to other services
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,

    /// Log driver
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSection>,

    /// Memory limit: bytes or a size string (`512m`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_limit: Option<Scalar>,

    /// Networks: list of names or mapping keyed by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Value>,

    /// Network mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,

    /// PID namespace mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,

    /// Published ports: strings or bare integers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Scalar>,

    /// Run privileged
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub privileged: bool,

    /// Image pull policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_policy: Option<String>,

    /// Stop signal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_signal: Option<String>,

    /// User
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Volumes in `[host:]container[:mode]` form
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Scalar>,

    /// Services or containers to mount volumes from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes_from: Vec<String>,

    /// Working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

/// Log driver section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Driver name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    /// Driver options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Scalar>,
}

/// Health check section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Healthcheck {
    /// Test: array (`[CMD-SHELL, ...]`) or shell string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Value>,

    /// Time between checks (`30s`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Time before a check counts as failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Consecutive failures before unhealthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<Scalar>,

    /// Disable any image-defined check
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable: bool,
}
