//! IR record types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// A group of containers that run together (a compose project, an ECS task,
/// a Kubernetes pod).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodGroup {
    /// Group name (task family, pod name). Compose files have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Containers in the group. Names are unique.
    #[serde(default)]
    pub containers: Vec<Container>,

    /// Labels that apply to the whole group
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub global_labels: BTreeMap<String, String>,

    /// Share the host network namespace
    #[serde(default)]
    pub host_network: bool,

    /// Share the host PID namespace
    #[serde(default)]
    pub host_pid: bool,

    /// Requested replica count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
}

impl PodGroup {
    /// Create an empty, unnamed group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty group with a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Append a container, keeping builder style.
    #[must_use]
    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    /// Look up a container by name.
    #[must_use]
    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.name == name)
    }
}

/// One workload's runtime specification.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Container {
    /// Container name, unique within its group
    pub name: String,

    /// Image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Command, shell-joined with single spaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Entrypoint, shell-joined with single spaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,

    /// Working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// User (name or uid)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Hostname inside the container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Run privileged
    #[serde(default)]
    pub privileged: bool,

    /// The group fails when this container stops
    #[serde(default)]
    pub essential: bool,

    /// Relative CPU shares (1024 = one core)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_shares: Option<u64>,

    /// Memory limit in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,

    /// Environment variables
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,

    /// Files to load environment variables from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_files: Vec<String>,

    /// Container labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// DNS servers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,

    /// DNS search domains
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_search: Vec<String>,

    /// Ports exposed without publishing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expose: Vec<u16>,

    /// Published ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortMapping>,

    /// Mounted volumes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,

    /// Containers to mount volumes from (`name` or `name:ro`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes_from: Vec<String>,

    /// Legacy container links
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,

    /// Networks (or network aliases) the container joins
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,

    /// Network mode (`bridge`, `host`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_mode: Option<String>,

    /// PID namespace mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,

    /// Log driver configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Logging>,

    /// Image build instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildContext>,

    /// Health checks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health_checks: Vec<HealthCheck>,

    /// Image pull policy, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_policy: Option<String>,

    /// Signal sent to stop the container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_signal: Option<String>,
}

impl Container {
    /// Create a container with a name and everything else unset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Transport protocol of a published port.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP (default)
    #[default]
    Tcp,
    /// UDP
    Udp,
}

impl Protocol {
    /// Lowercase protocol name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = CodecError;

    /// Case-insensitive; an empty string means the default (`tcp`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("tcp") {
            Ok(Self::Tcp)
        } else if s.eq_ignore_ascii_case("udp") {
            Ok(Self::Udp)
        } else {
            Err(CodecError::UnknownProtocol {
                value: s.to_string(),
            })
        }
    }
}

/// A published port.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortMapping {
    /// Host interface to bind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_ip: Option<String>,

    /// Host port, 0 when unset (published dynamically or omitted)
    #[serde(default)]
    pub host_port: u16,

    /// Port inside the container
    pub container_port: u16,

    /// Transport protocol
    #[serde(default)]
    pub protocol: Protocol,

    /// Port name (Kubernetes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PortMapping {
    /// A container-only TCP port.
    #[must_use]
    pub fn container(port: u16) -> Self {
        Self {
            container_port: port,
            ..Self::default()
        }
    }

    /// A host-to-container TCP port.
    #[must_use]
    pub fn published(host_port: u16, container_port: u16) -> Self {
        Self {
            host_port,
            container_port,
            ..Self::default()
        }
    }
}

/// A mounted volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Volume {
    /// Host path, absent for container-only volumes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Mount path inside the container
    pub container: String,

    /// Mount read-only
    #[serde(default)]
    pub read_only: bool,
}

impl Volume {
    /// A host path bind-mounted read-write.
    #[must_use]
    pub fn bind(host: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            container: container.into(),
            read_only: false,
        }
    }
}

/// Log driver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Logging {
    /// Driver name
    pub driver: String,

    /// Driver options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

/// Image build instructions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildContext {
    /// Build directory
    pub context: String,

    /// Dockerfile path override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,

    /// Build arguments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, String>,
}

/// A health check: one probe plus its timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthCheck {
    /// What to run
    pub probe: Probe,

    /// Seconds between checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,

    /// Seconds before a check counts as failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,

    /// Consecutive failures before the container is unhealthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<u32>,
}

impl HealthCheck {
    /// An exec check with no timing set.
    #[must_use]
    pub fn exec(command: impl Into<String>) -> Self {
        Self {
            probe: Probe::Exec {
                command: command.into(),
            },
            interval: None,
            timeout: None,
            failure_threshold: None,
        }
    }

    /// The exec command, if this is an exec check.
    #[must_use]
    pub fn exec_command(&self) -> Option<&str> {
        match &self.probe {
            Probe::Exec { command } => Some(command),
            Probe::Http(_) => None,
        }
    }
}

/// The two mutually exclusive health probe forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Probe {
    /// Run a command inside the container
    Exec {
        /// Shell-joined command
        command: String,
    },
    /// Issue an HTTP GET
    Http(HttpProbe),
}

/// HTTP GET probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpProbe {
    /// Request path
    #[serde(default)]
    pub path: String,

    /// Target port
    pub port: u16,

    /// Host header / target host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// `HTTP` or `HTTPS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Extra request headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}
