//! ECS Task Definition Schema Types
//!
//! Native shapes of an Amazon ECS task definition (JSON, camelCase). Numbers
//! use the lenient [`Scalar`] so `"512"` and `512` both decode and a bad
//! value is reported against its container.
//! See: <https://docs.aws.amazon.com/AmazonECS/latest/developerguide/task_definition_parameters.html>

use podshift_convert::codec::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A task definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    /// Task family name
    #[serde(default)]
    pub family: String,

    /// Task-level network mode (`bridge`, `host`, `awsvpc`, `none`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,

    /// Task-level PID mode (`host`, `task`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid_mode: Option<String>,

    /// Containers in the task
    #[serde(default)]
    pub container_definitions: Vec<ContainerDefinition>,

    /// Named volumes referenced by mount points
    #[serde(default)]
    pub volumes: Vec<TaskVolume>,

    /// Task tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// A container definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDefinition {
    /// Command arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    /// CPU units (1024 per vCPU)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Scalar>,

    /// DNS servers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_servers: Vec<String>,

    /// DNS search domains
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_search_domains: Vec<String>,

    /// Docker labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub docker_labels: BTreeMap<String, Scalar>,

    /// Entrypoint arguments
    #[serde(default, rename = "entryPoint", skip_serializing_if = "Vec::is_empty")]
    pub entry_point: Vec<String>,

    /// Environment variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<KeyValuePair>,

    /// Environment files
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment_files: Vec<EnvironmentFile>,

    /// The task stops when this container stops
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essential: Option<bool>,

    /// Health check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheckDefinition>,

    /// Container hostname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Image reference
    #[serde(default)]
    pub image: String,

    /// Legacy links
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,

    /// Log configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_configuration: Option<LogConfiguration>,

    /// Hard memory limit in MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Scalar>,

    /// Volume mounts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mount_points: Vec<MountPoint>,

    /// Container name
    #[serde(default)]
    pub name: String,

    /// Published ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub port_mappings: Vec<EcsPortMapping>,

    /// Run privileged
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub privileged: bool,

    /// User
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Containers to mount volumes from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes_from: Vec<VolumeFrom>,

    /// Working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

/// A `name`/`value` pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Variable name
    pub name: String,
    /// Variable value
    #[serde(default)]
    pub value: Scalar,
}

/// An environment file reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentFile {
    /// Object location
    pub value: String,
    /// Location type, always `s3`
    #[serde(rename = "type", default = "default_environment_file_type")]
    pub file_type: String,
}

fn default_environment_file_type() -> String {
    "s3".to_string()
}

/// Log configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfiguration {
    /// Log driver
    #[serde(default)]
    pub log_driver: String,

    /// Driver options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Scalar>,
}

/// A published port
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcsPortMapping {
    /// Host port, absent or 0 for dynamic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<Scalar>,

    /// Container port
    #[serde(default)]
    pub container_port: Scalar,

    /// `tcp` or `udp`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// Port name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A mount of a named task volume
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountPoint {
    /// Task volume name
    pub source_volume: String,

    /// Mount path in the container
    pub container_path: String,

    /// Mount read-only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}

/// Volumes shared from another container
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeFrom {
    /// Container to mount from
    pub source_container: String,

    /// Mount read-only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}

/// Container health check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckDefinition {
    /// Test array (`["CMD-SHELL", "..."]`)
    #[serde(default)]
    pub command: Vec<String>,

    /// Seconds between checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Scalar>,

    /// Seconds before a check fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Scalar>,

    /// Failures before unhealthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<Scalar>,
}

/// A named task volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskVolume {
    /// Name referenced by `sourceVolume`
    pub name: String,

    /// Host path binding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<VolumeHost>,
}

/// Host path of a task volume
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeHost {
    /// Path on the container instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
}

/// A task tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key
    pub key: String,
    /// Tag value
    #[serde(default)]
    pub value: String,
}
