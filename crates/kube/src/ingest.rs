//! Kubernetes pod ingester

use podshift_convert::codec::{self, Scalar, volume::VolumeRegistry};
use podshift_convert::{
    CodecError, Container, Error, HealthCheck, HttpProbe, Ingester, PodGroup, PortMapping, Probe,
    Protocol, Result, Volume, finish_ingest,
};

use std::collections::BTreeMap;

use crate::FORMAT;
use crate::schema::{ContainerPort, KubeContainer, Pod, ProbeSpec, VolumeMount};

/// Kubernetes `Pod` ingester
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeIngester;

impl KubeIngester {
    /// Create a new pod ingester
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Ingester for KubeIngester {
    #[tracing::instrument(name = "k8s_ingest", skip_all)]
    fn ingest_str(&self, document: &str) -> Result<PodGroup> {
        let pod: Pod = serde_yaml::from_str(document).map_err(|e| Error::structural(FORMAT, e))?;

        if let Some(kind) = pod.kind.as_deref()
            && kind != "Pod"
        {
            return Err(Error::structural(
                FORMAT,
                format!("expected kind Pod, found {kind}"),
            ));
        }

        let mut registry = VolumeRegistry::new();
        for volume in pod.spec.volumes {
            registry.insert(volume.name, volume.host_path.map(|source| source.path));
        }

        let global_labels = codec::kv::stringify_values(&pod.metadata.labels)
            .map_err(|e| Error::structural(FORMAT, format!("metadata.labels: {e}")))?;

        let mut group = PodGroup {
            name: pod.metadata.name.filter(|n| !n.is_empty()),
            global_labels,
            host_network: pod.spec.host_network,
            host_pid: pod.spec.host_pid,
            ..PodGroup::new()
        };

        for spec in pod.spec.containers {
            let mut container = ingest_container(spec, &registry)?;
            container.hostname.clone_from(&pod.spec.hostname);
            group.containers.push(container);
        }
        finish_ingest(FORMAT, group)
    }

    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn description(&self) -> &'static str {
        "Kubernetes Pod manifest (YAML or JSON)"
    }
}

fn ingest_container(spec: KubeContainer, registry: &VolumeRegistry) -> Result<Container> {
    let name = spec.name;
    let err = |field: &'static str| {
        let name = name.clone();
        move |source: CodecError| Error::field(FORMAT, name, field, source)
    };

    let environment: BTreeMap<String, String> = spec
        .env
        .iter()
        .map(|var| Ok((var.name.clone(), var.value.to_text()?)))
        .collect::<std::result::Result<_, CodecError>>()
        .map_err(err("env"))?;

    let ports = spec
        .ports
        .iter()
        .map(ingest_port)
        .collect::<std::result::Result<Vec<_>, CodecError>>()
        .map_err(err("ports"))?;

    let volumes = spec
        .volume_mounts
        .iter()
        .map(|mount| ingest_mount(mount, registry))
        .collect();

    let health_checks = spec
        .liveness_probe
        .as_ref()
        .map(|probe| ingest_probe(probe, &spec.ports))
        .transpose()
        .map_err(err("livenessProbe"))?
        .flatten()
        .into_iter()
        .collect();

    let limit = |resource: &str| spec.resources.limits.get(resource).map(Scalar::to_text).transpose();
    let memory = limit("memory")
        .and_then(|q| q.as_deref().map(codec::resources::parse_memory_quantity).transpose())
        .map_err(err("resources.limits.memory"))?;
    let cpu_shares = limit("cpu")
        .and_then(|q| q.as_deref().map(codec::resources::parse_cpu_quantity).transpose())
        .map_err(err("resources.limits.cpu"))?
        .filter(|n| *n > 0);

    let security = spec.security_context.unwrap_or_default();
    let user = security
        .run_as_user
        .as_ref()
        .map(Scalar::to_text)
        .transpose()
        .map_err(err("securityContext.runAsUser"))?;

    Ok(Container {
        image: spec.image.filter(|i| !i.is_empty()),
        command: codec::command::join(&spec.args),
        entrypoint: codec::command::join(&spec.command),
        working_dir: spec.working_dir,
        user,
        privileged: security.privileged.unwrap_or(false),
        cpu_shares,
        memory,
        environment,
        ports,
        volumes,
        health_checks,
        pull_policy: spec.image_pull_policy,
        ..Container::new(name.clone())
    })
}

fn ingest_port(port: &ContainerPort) -> std::result::Result<PortMapping, CodecError> {
    Ok(PortMapping {
        host_ip: port.host_ip.clone().filter(|ip| !ip.is_empty()),
        host_port: port.host_port.as_ref().map_or(Ok(0), Scalar::to_number)?,
        container_port: port.container_port.to_number()?,
        protocol: port.protocol.as_deref().unwrap_or_default().parse::<Protocol>()?,
        name: port.name.clone(),
    })
}

/// Unknown volume names and non-`hostPath` volumes mount without a host path.
fn ingest_mount(mount: &VolumeMount, registry: &VolumeRegistry) -> Volume {
    let host = registry.resolve(&mount.name).map(|host| match mount.sub_path.as_deref() {
        Some(sub) if !sub.is_empty() => join_sub_path(host, sub),
        _ => host.to_string(),
    });
    Volume {
        host,
        container: mount.mount_path.clone(),
        read_only: mount.read_only,
    }
}

fn join_sub_path(host: &str, sub: &str) -> String {
    format!("{}/{}", host.trim_end_matches('/'), sub.trim_start_matches('/'))
}

fn ingest_probe(
    probe: &ProbeSpec,
    declared: &[ContainerPort],
) -> std::result::Result<Option<HealthCheck>, CodecError> {
    let probe_kind = if let Some(command) = probe
        .exec
        .as_ref()
        .and_then(|exec| codec::command::join(&exec.command))
    {
        Probe::Exec { command }
    } else if let Some(http) = &probe.http_get {
        Probe::Http(HttpProbe {
            path: http.path.clone().unwrap_or_default(),
            port: resolve_probe_port(&http.port, declared)?,
            host: http.host.clone(),
            scheme: http.scheme.clone(),
            headers: http
                .http_headers
                .iter()
                .map(|h| (h.name.clone(), h.value.clone()))
                .collect(),
        })
    } else {
        return Ok(None);
    };

    let seconds = |value: Option<&Scalar>| value.map(Scalar::to_number::<u32>).transpose();
    Ok(Some(HealthCheck {
        probe: probe_kind,
        interval: seconds(probe.period_seconds.as_ref())?,
        timeout: seconds(probe.timeout_seconds.as_ref())?,
        failure_threshold: seconds(probe.failure_threshold.as_ref())?,
    }))
}

/// A probe port is a number or the name of one of the container's ports.
fn resolve_probe_port(port: &Scalar, declared: &[ContainerPort]) -> std::result::Result<u16, CodecError> {
    match port {
        Scalar::Text(name) if !name.is_empty() && !name.bytes().all(|b| b.is_ascii_digit()) => declared
            .iter()
            .find(|p| p.name.as_deref() == Some(name.as_str()))
            .ok_or_else(|| CodecError::UnknownPortName { name: name.clone() })
            .and_then(|p| p.container_port.to_number()),
        other => other.to_number(),
    }
}
