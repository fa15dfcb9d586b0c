//! ECS task definition ingester

use podshift_convert::codec::{self, Scalar, volume::VolumeRegistry};
use podshift_convert::{
    CodecError, Container, Error, HealthCheck, Ingester, Logging, PodGroup, PortMapping, Protocol,
    Result, Volume, finish_ingest,
};

use std::collections::BTreeMap;

use crate::FORMAT;
use crate::schema::{ContainerDefinition, HealthCheckDefinition, TaskDefinition};

/// ECS task definition ingester
#[derive(Debug, Clone, Copy, Default)]
pub struct EcsIngester;

impl EcsIngester {
    /// Create a new ECS ingester
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Ingester for EcsIngester {
    #[tracing::instrument(name = "ecs_ingest", skip_all)]
    fn ingest_str(&self, document: &str) -> Result<PodGroup> {
        let task: TaskDefinition =
            serde_json::from_str(document).map_err(|e| Error::structural(FORMAT, e))?;

        let mut registry = VolumeRegistry::new();
        for volume in task.volumes {
            registry.insert(volume.name, volume.host.and_then(|h| h.source_path));
        }

        let host_network = task.network_mode.as_deref() == Some("host");
        let host_pid = task.pid_mode.as_deref() == Some("host");
        let shared_network_mode = task.network_mode.filter(|_| !host_network);
        let shared_pid = task.pid_mode.filter(|_| !host_pid);

        let mut group = PodGroup {
            name: Some(task.family).filter(|f| !f.is_empty()),
            global_labels: task.tags.into_iter().map(|t| (t.key, t.value)).collect(),
            host_network,
            host_pid,
            ..PodGroup::new()
        };

        for definition in task.container_definitions {
            let mut container = ingest_container(definition, &registry)?;
            container.network_mode = shared_network_mode.clone();
            container.pid = shared_pid.clone();
            group.containers.push(container);
        }
        finish_ingest(FORMAT, group)
    }

    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn description(&self) -> &'static str {
        "Amazon ECS task definition (JSON)"
    }
}

fn ingest_container(definition: ContainerDefinition, registry: &VolumeRegistry) -> Result<Container> {
    let name = definition.name;
    let err = |field: &'static str| {
        let name = name.clone();
        move |source: CodecError| Error::field(FORMAT, name, field, source)
    };

    let environment: BTreeMap<String, String> = definition
        .environment
        .iter()
        .map(|pair| Ok((pair.name.clone(), pair.value.to_text()?)))
        .collect::<std::result::Result<_, CodecError>>()
        .map_err(err("environment"))?;
    let labels = codec::kv::stringify_values(&definition.docker_labels).map_err(err("dockerLabels"))?;

    let ports = definition
        .port_mappings
        .iter()
        .map(|pm| {
            Ok(PortMapping {
                host_ip: None,
                host_port: pm.host_port.as_ref().map_or(Ok(0), Scalar::to_number)?,
                container_port: pm.container_port.to_number()?,
                protocol: pm.protocol.as_deref().unwrap_or_default().parse::<Protocol>()?,
                name: pm.name.clone(),
            })
        })
        .collect::<std::result::Result<Vec<_>, CodecError>>()
        .map_err(err("portMappings"))?;

    let volumes = definition
        .mount_points
        .into_iter()
        .map(|mp| Volume {
            host: registry.resolve(&mp.source_volume).map(str::to_string),
            container: mp.container_path,
            read_only: mp.read_only,
        })
        .collect();

    let memory_mib = definition
        .memory
        .as_ref()
        .map(Scalar::to_number::<u64>)
        .transpose()
        .map_err(err("memory"))?;
    let cpu_shares = definition
        .cpu
        .as_ref()
        .map(Scalar::to_number::<u64>)
        .transpose()
        .map_err(err("cpu"))?
        .filter(|n| *n > 0);

    let logging = definition
        .log_configuration
        .map(|config| {
            codec::kv::stringify_values(&config.options).map(|options| Logging {
                driver: config.log_driver,
                options,
            })
        })
        .transpose()
        .map_err(err("logConfiguration"))?;

    let health_checks = definition
        .health_check
        .map(ingest_health_check)
        .transpose()
        .map_err(err("healthCheck"))?
        .flatten()
        .into_iter()
        .collect();

    Ok(Container {
        image: Some(definition.image).filter(|i| !i.is_empty()),
        command: codec::command::join(&definition.command),
        entrypoint: codec::command::join(&definition.entry_point),
        working_dir: definition.working_directory,
        user: definition.user,
        hostname: definition.hostname,
        privileged: definition.privileged,
        essential: definition.essential.unwrap_or(false),
        cpu_shares,
        memory: Some(codec::resources::mib_to_bytes(memory_mib)),
        environment,
        env_files: definition
            .environment_files
            .into_iter()
            .map(|file| file.value)
            .collect(),
        labels,
        dns: definition.dns_servers,
        dns_search: definition.dns_search_domains,
        ports,
        volumes,
        volumes_from: definition
            .volumes_from
            .into_iter()
            .map(|vf| {
                if vf.read_only {
                    format!("{}:ro", vf.source_container)
                } else {
                    vf.source_container
                }
            })
            .collect(),
        links: definition.links,
        logging,
        health_checks,
        ..Container::new(name.clone())
    })
}

fn ingest_health_check(definition: HealthCheckDefinition) -> std::result::Result<Option<HealthCheck>, CodecError> {
    let Some(command) = codec::health::exec_from_test(&definition.command) else {
        return Ok(None);
    };
    let seconds = |value: Option<Scalar>| value.as_ref().map(Scalar::to_number::<u32>).transpose();

    Ok(Some(HealthCheck {
        interval: seconds(definition.interval)?,
        timeout: seconds(definition.timeout)?,
        failure_threshold: seconds(definition.retries)?,
        ..HealthCheck::exec(command)
    }))
}
