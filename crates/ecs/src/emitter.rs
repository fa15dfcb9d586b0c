//! ECS Task Definition Emitter
//!
//! Transforms a [`PodGroup`] into an ECS task definition.

use podshift_convert::codec::{self, Scalar, volume::VolumeRegistry};
use podshift_convert::{Container, Emitter, Error, PodGroup, Probe, Result, canonicalize};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::FORMAT;
use crate::schema::{
    ContainerDefinition, EcsPortMapping, EnvironmentFile, HealthCheckDefinition, KeyValuePair,
    LogConfiguration, MountPoint, Tag, TaskDefinition, TaskVolume, VolumeFrom, VolumeHost,
};

/// Indent width used when none is configured.
pub const DEFAULT_INDENT: usize = 4;

/// ECS task definition emitter
///
/// # IR to ECS Mapping
///
/// | IR Field | ECS JSON |
/// |----------|----------|
/// | `group.name` | `family` |
/// | `group.host_network` | `networkMode: host` |
/// | `group.global_labels` | `tags` |
/// | `container.memory` | `memory` (MiB, at least 4) |
/// | `container.command` | `command` (split on spaces) |
/// | `container.volumes` | `mountPoints` + task `volumes` |
/// | `container.volumes_from` | `volumesFrom` |
/// | `container.health_checks[0]` | `healthCheck` (`CMD-SHELL`) |
#[derive(Debug, Clone)]
pub struct EcsEmitter {
    /// Spaces per indent level in the JSON output
    pub indent: usize,
}

impl Default for EcsEmitter {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl EcsEmitter {
    /// Create a new ECS emitter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JSON indent width
    #[must_use]
    pub const fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    fn build_task(group: &PodGroup) -> TaskDefinition {
        let mut registry = VolumeRegistry::new();
        let container_definitions = group
            .containers
            .iter()
            .map(|container| build_container(container, &mut registry))
            .collect();

        let volumes = registry
            .into_entries()
            .map(|(name, source_path)| TaskVolume {
                name,
                host: source_path.map(|path| VolumeHost {
                    source_path: Some(path),
                }),
            })
            .collect();

        TaskDefinition {
            family: group.name.clone().unwrap_or_default(),
            network_mode: task_mode(group, group.host_network, |c| c.network_mode.as_deref()),
            pid_mode: task_mode(group, group.host_pid, |c| c.pid.as_deref()),
            container_definitions,
            volumes,
            tags: group
                .global_labels
                .iter()
                .map(|(key, value)| Tag {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }

    fn to_json(&self, task: &TaskDefinition) -> Result<String> {
        let indent = " ".repeat(self.indent);
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
        task.serialize(&mut serializer)
            .map_err(|e| Error::serialization(FORMAT, e))?;
        String::from_utf8(buffer).map_err(|e| Error::serialization(FORMAT, e))
    }
}

/// ECS sets network and PID modes per task. `host` wins when the group asks
/// for it; otherwise a mode shared by every container is kept and a mix is
/// dropped.
fn task_mode(
    group: &PodGroup,
    host: bool,
    mode: impl Fn(&Container) -> Option<&str>,
) -> Option<String> {
    if host {
        return Some("host".to_string());
    }
    let mut modes = group.containers.iter().map(&mode);
    let first = modes.next()??;
    if modes.all(|m| m == Some(first)) {
        Some(first.to_string())
    } else {
        tracing::warn!("Containers disagree on a task-level mode; leaving it unset");
        None
    }
}

fn build_container(container: &Container, registry: &mut VolumeRegistry) -> ContainerDefinition {
    warn_unsupported(container);

    ContainerDefinition {
        command: container
            .command
            .as_deref()
            .map(codec::command::split)
            .unwrap_or_default(),
        cpu: container.cpu_shares.map(Scalar::from),
        dns_servers: container.dns.clone(),
        dns_search_domains: container.dns_search.clone(),
        docker_labels: container
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), Scalar::from(v.as_str())))
            .collect(),
        entry_point: container
            .entrypoint
            .as_deref()
            .map(codec::command::split)
            .unwrap_or_default(),
        environment: container
            .environment
            .iter()
            .map(|(name, value)| KeyValuePair {
                name: name.clone(),
                value: Scalar::from(value.as_str()),
            })
            .collect(),
        environment_files: container
            .env_files
            .iter()
            .map(|value| EnvironmentFile {
                value: value.clone(),
                file_type: "s3".to_string(),
            })
            .collect(),
        essential: container.essential.then_some(true),
        health_check: build_health_check(container),
        hostname: container.hostname.clone(),
        image: container.image.clone().unwrap_or_default(),
        links: container.links.clone(),
        log_configuration: container.logging.as_ref().map(|logging| LogConfiguration {
            log_driver: logging.driver.clone(),
            options: logging
                .options
                .iter()
                .map(|(k, v)| (k.clone(), Scalar::from(v.as_str())))
                .collect(),
        }),
        memory: Some(Scalar::from(codec::resources::bytes_to_mib(container.memory))),
        mount_points: container
            .volumes
            .iter()
            .map(|volume| MountPoint {
                source_volume: registry.register(volume),
                container_path: volume.container.clone(),
                read_only: volume.read_only,
            })
            .collect(),
        name: container.name.clone(),
        port_mappings: container
            .ports
            .iter()
            .map(|pm| EcsPortMapping {
                host_port: (pm.host_port > 0).then(|| Scalar::from(u64::from(pm.host_port))),
                container_port: Scalar::from(u64::from(pm.container_port)),
                protocol: Some(pm.protocol.as_str().to_string()),
                name: pm.name.clone(),
            })
            .collect(),
        privileged: container.privileged,
        user: container.user.clone(),
        volumes_from: container
            .volumes_from
            .iter()
            .map(|entry| VolumeFrom {
                source_container: entry.split(':').next().unwrap_or_default().to_string(),
                read_only: entry.ends_with(":ro"),
            })
            .collect(),
        working_directory: container.working_dir.clone(),
    }
}

fn build_health_check(container: &Container) -> Option<HealthCheckDefinition> {
    let check = container.health_checks.iter().find(|check| match check.probe {
        Probe::Exec { .. } => true,
        Probe::Http(_) => {
            tracing::warn!(
                container = %container.name,
                "ECS health checks only run commands; dropping HTTP probe"
            );
            false
        }
    })?;
    let command = check.exec_command()?;

    Some(HealthCheckDefinition {
        command: codec::health::exec_to_test(command),
        interval: check.interval.map(|n| Scalar::from(u64::from(n))),
        timeout: check.timeout.map(|n| Scalar::from(u64::from(n))),
        retries: check.failure_threshold.map(|n| Scalar::from(u64::from(n))),
    })
}

fn warn_unsupported(container: &Container) {
    let dropped = [
        ("build", container.build.is_some()),
        ("expose", !container.expose.is_empty()),
        ("networks", !container.networks.is_empty()),
        ("pull_policy", container.pull_policy.is_some()),
        ("stop_signal", container.stop_signal.is_some()),
        ("host_ip", container.ports.iter().any(|p| p.host_ip.is_some())),
    ];
    for (field, present) in dropped {
        if present {
            tracing::warn!(container = %container.name, field, "Not representable in ECS; dropping");
        }
    }
}

impl Emitter for EcsEmitter {
    #[tracing::instrument(name = "ecs_emit", skip_all, fields(containers = group.containers.len()))]
    fn emit(&self, group: &PodGroup) -> Result<String> {
        let task = Self::build_task(&canonicalize(group));
        self.to_json(&task)
    }

    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn description(&self) -> &'static str {
        "Amazon ECS task definition (JSON)"
    }
}
