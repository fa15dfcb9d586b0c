//! Compose ingester
//!
//! Turns a compose file into a [`PodGroup`]. Compose files have no group
//! name; each service becomes one container named after its key.

use podshift_convert::codec::{self, Scalar};
use podshift_convert::{
    CodecError, Container, Error, HealthCheck, Ingester, Logging, PodGroup, Result, finish_ingest,
};
use serde::de::IgnoredAny;
use serde_yaml::Value;
use std::collections::BTreeMap;

use crate::FORMAT;
use crate::schema::{ComposeFile, Healthcheck, Service};

/// Docker Compose ingester
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeIngester;

impl ComposeIngester {
    /// Create a new compose ingester
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Ingester for ComposeIngester {
    #[tracing::instrument(name = "compose_ingest", skip_all)]
    fn ingest_str(&self, document: &str) -> Result<PodGroup> {
        let file: ComposeFile =
            serde_yaml::from_str(document).map_err(|e| Error::structural(FORMAT, e))?;

        let mut group = PodGroup::new();
        for (name, service) in file.services {
            group.containers.push(ingest_service(name, service)?);
        }
        finish_ingest(FORMAT, group)
    }

    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn description(&self) -> &'static str {
        "Docker Compose file (YAML)"
    }
}

/// Attaches the container name and native field name to a codec error.
struct FieldContext<'a> {
    container: &'a str,
}

impl FieldContext<'_> {
    fn err(&self, field: &'static str) -> impl Fn(CodecError) -> Error + '_ {
        move |source| Error::field(FORMAT, self.container, field, source)
    }
}

fn ingest_service(name: String, service: Service) -> Result<Container> {
    let ctx = FieldContext { container: &name };

    let environment = service
        .environment
        .map(codec::kv::decode)
        .transpose()
        .map_err(ctx.err("environment"))?
        .unwrap_or_default();
    let labels = service
        .labels
        .map(codec::kv::decode)
        .transpose()
        .map_err(ctx.err("labels"))?
        .unwrap_or_default();

    let ports = service
        .ports
        .iter()
        .map(|entry| entry.to_text().and_then(|text| codec::port::decode(&text)))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(ctx.err("ports"))?;
    let volumes = service
        .volumes
        .iter()
        .map(|entry| entry.to_text().and_then(|text| codec::volume::decode(&text)))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(ctx.err("volumes"))?;
    let expose = service
        .expose
        .iter()
        .map(decode_expose)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(ctx.err("expose"))?;

    let memory = service
        .mem_limit
        .as_ref()
        .map(decode_mem_limit)
        .transpose()
        .map_err(ctx.err("mem_limit"))?;
    let cpu_shares = service
        .cpu_shares
        .as_ref()
        .map(Scalar::to_number::<u64>)
        .transpose()
        .map_err(ctx.err("cpu_shares"))?;

    let logging = service
        .logging
        .map(|section| {
            codec::kv::stringify_values(&section.options).map(|options| Logging {
                driver: section.driver.unwrap_or_default(),
                options,
            })
        })
        .transpose()
        .map_err(ctx.err("logging"))?;

    let health_checks = service
        .healthcheck
        .map(decode_healthcheck)
        .transpose()
        .map_err(ctx.err("healthcheck"))?
        .flatten()
        .into_iter()
        .collect();

    Ok(Container {
        image: service.image,
        command: decode_command(service.command).map_err(ctx.err("command"))?,
        entrypoint: decode_command(service.entrypoint).map_err(ctx.err("entrypoint"))?,
        working_dir: service.working_dir,
        user: service.user,
        hostname: service.hostname,
        privileged: service.privileged,
        cpu_shares,
        memory,
        environment,
        env_files: decode_list(service.env_file).map_err(ctx.err("env_file"))?,
        labels,
        dns: decode_list(service.dns).map_err(ctx.err("dns"))?,
        dns_search: decode_list(service.dns_search).map_err(ctx.err("dns_search"))?,
        expose,
        ports,
        volumes,
        volumes_from: service.volumes_from,
        links: service.links,
        networks: decode_networks(service.networks).map_err(ctx.err("networks"))?,
        network_mode: service.network_mode,
        pid: service.pid,
        logging,
        build: service
            .build
            .map(codec::build::decode)
            .transpose()
            .map_err(ctx.err("build"))?,
        health_checks,
        pull_policy: service.pull_policy,
        stop_signal: service.stop_signal,
        ..Container::new(name.clone())
    })
}

fn decode_command(node: Option<Value>) -> std::result::Result<Option<String>, CodecError> {
    Ok(node.map(codec::command::decode).transpose()?.flatten())
}

fn decode_list(node: Option<Value>) -> std::result::Result<Vec<String>, CodecError> {
    Ok(node
        .map(codec::command::decode_list)
        .transpose()?
        .unwrap_or_default())
}

/// Networks are a list of names or a mapping keyed by name.
fn decode_networks(node: Option<Value>) -> std::result::Result<Vec<String>, CodecError> {
    let Some(node) = node else {
        return Ok(Vec::new());
    };
    let shape = codec::decode_either::<_, BTreeMap<String, IgnoredAny>, Vec<String>>(node)
        .map_err(|e| CodecError::UnsupportedShape {
            expected: "a list of network names or a mapping keyed by network name",
            found: e.to_string(),
        })?;
    Ok(match shape {
        codec::Shape::Structured(map) => map.into_keys().collect(),
        codec::Shape::Flat(names) => names,
    })
}

/// `mem_limit` is either a byte count or a size string such as `512m`.
fn decode_mem_limit(value: &Scalar) -> std::result::Result<u64, CodecError> {
    match value {
        Scalar::Int(bytes) => Ok(*bytes),
        other => codec::resources::parse_byte_size(&other.to_text()?),
    }
}

/// `expose` entries are ports, optionally with a `/tcp` or `/udp` suffix.
fn decode_expose(value: &Scalar) -> std::result::Result<u16, CodecError> {
    match value {
        Scalar::Int(_) => value.to_number(),
        other => {
            let text = other.to_text()?;
            let port = text
                .strip_suffix("/tcp")
                .or_else(|| text.strip_suffix("/udp"))
                .unwrap_or(&text);
            Scalar::from(port).to_number()
        }
    }
}

fn decode_healthcheck(section: Healthcheck) -> std::result::Result<Option<HealthCheck>, CodecError> {
    if section.disable {
        return Ok(None);
    }
    let Some(command) = section
        .test
        .map(codec::health::decode_test)
        .transpose()?
        .flatten()
    else {
        return Ok(None);
    };

    Ok(Some(HealthCheck {
        interval: section
            .interval
            .as_deref()
            .map(codec::health::parse_duration)
            .transpose()?,
        timeout: section
            .timeout
            .as_deref()
            .map(codec::health::parse_duration)
            .transpose()?,
        failure_threshold: section
            .retries
            .as_ref()
            .map(Scalar::to_number::<u32>)
            .transpose()?,
        ..HealthCheck::exec(command)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use podshift_convert::{PortMapping, Protocol, Volume};

    fn ingest(document: &str) -> Result<PodGroup> {
        ComposeIngester::new().ingest_str(document)
    }

    #[test]
    fn test_minimal_service() {
        let group = ingest("version: '2'\nservices:\n  web:\n    image: nginx\n").unwrap();
        assert_eq!(group.name, None);
        assert_eq!(group.containers.len(), 1);
        assert_eq!(group.containers[0].name, "web");
        assert_eq!(group.containers[0].image.as_deref(), Some("nginx"));
    }

    #[test]
    fn test_containers_sorted_by_name() {
        let group = ingest("services:\n  web: {image: a}\n  api: {image: b}\n  db: {image: c}\n").unwrap();
        let names: Vec<_> = group.containers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["api", "db", "web"]);
    }

    #[test]
    fn test_environment_shapes() {
        let group = ingest(
            "services:\n  a:\n    environment:\n      PORT: 8080\n      DEBUG: true\n  b:\n    environment:\n      - PORT=8080\n      - DEBUG\n",
        )
        .unwrap();
        let a = group.container("a").unwrap();
        let b = group.container("b").unwrap();
        assert_eq!(a.environment.get("PORT").map(String::as_str), Some("8080"));
        assert_eq!(a.environment.get("DEBUG").map(String::as_str), Some("true"));
        assert_eq!(b.environment.get("PORT").map(String::as_str), Some("8080"));
        assert_eq!(b.environment.get("DEBUG").map(String::as_str), Some(""));
    }

    #[test]
    fn test_ports_and_volumes() {
        let group = ingest(
            "services:\n  web:\n    ports:\n      - 8080\n      - \"80:8080\"\n      - \"127.0.0.1:53:53/udp\"\n    volumes:\n      - /var/lib/data:/data:ro\n      - /cache\n",
        )
        .unwrap();
        let web = group.container("web").unwrap();
        assert_eq!(web.ports[0], PortMapping::container(8080));
        assert_eq!(web.ports[1], PortMapping::published(80, 8080));
        assert_eq!(web.ports[2].host_ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(web.ports[2].protocol, Protocol::Udp);
        assert_eq!(
            web.volumes[0],
            Volume {
                read_only: true,
                ..Volume::bind("/var/lib/data", "/data")
            }
        );
        assert_eq!(web.volumes[1].host, None);
    }

    #[test]
    fn test_build_shapes() {
        let group = ingest(
            "services:\n  a:\n    build: ./a\n  b:\n    build:\n      context: ./b\n      dockerfile: Dockerfile.dev\n      args:\n        - VERSION=1\n",
        )
        .unwrap();
        let a = group.container("a").unwrap().build.clone().unwrap();
        let b = group.container("b").unwrap().build.clone().unwrap();
        assert_eq!(a.context, "./a");
        assert_eq!(b.context, "./b");
        assert_eq!(b.dockerfile.as_deref(), Some("Dockerfile.dev"));
        assert_eq!(b.args.get("VERSION").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_command_shapes() {
        let group = ingest(
            "services:\n  a:\n    command: npm start\n  b:\n    command: [npm, run, dev]\n    entrypoint: /docker-entrypoint.sh\n",
        )
        .unwrap();
        assert_eq!(group.container("a").unwrap().command.as_deref(), Some("npm start"));
        let b = group.container("b").unwrap();
        assert_eq!(b.command.as_deref(), Some("npm run dev"));
        assert_eq!(b.entrypoint.as_deref(), Some("/docker-entrypoint.sh"));
    }

    #[test]
    fn test_memory_and_cpu() {
        let group = ingest(
            "services:\n  a:\n    mem_limit: 512m\n    cpu_shares: 512\n  b:\n    mem_limit: 1048576\n",
        )
        .unwrap();
        assert_eq!(group.container("a").unwrap().memory, Some(512 << 20));
        assert_eq!(group.container("a").unwrap().cpu_shares, Some(512));
        assert_eq!(group.container("b").unwrap().memory, Some(1 << 20));
    }

    #[test]
    fn test_networks_shapes() {
        let group = ingest(
            "services:\n  a:\n    networks: [front, back]\n  b:\n    networks:\n      back:\n      front:\n        aliases: [web]\n",
        )
        .unwrap();
        assert_eq!(group.container("a").unwrap().networks, vec!["front", "back"]);
        assert_eq!(group.container("b").unwrap().networks, vec!["back", "front"]);
    }

    #[test]
    fn test_healthcheck() {
        let group = ingest(
            "services:\n  db:\n    healthcheck:\n      test: [CMD-SHELL, pg_isready]\n      interval: 1m30s\n      timeout: 10s\n      retries: 3\n  off:\n    healthcheck:\n      disable: true\n",
        )
        .unwrap();
        let check = &group.container("db").unwrap().health_checks[0];
        assert_eq!(check.exec_command(), Some("pg_isready"));
        assert_eq!(check.interval, Some(90));
        assert_eq!(check.timeout, Some(10));
        assert_eq!(check.failure_threshold, Some(3));
        assert!(group.container("off").unwrap().health_checks.is_empty());
    }

    #[test]
    fn test_bad_port_names_container_and_field() {
        let err = ingest("services:\n  web:\n    ports:\n      - \"80:http\"\n").unwrap_err();
        match err {
            Error::FieldDecode {
                format,
                container,
                field,
                source,
            } => {
                assert_eq!(format, "compose");
                assert_eq!(container, "web");
                assert_eq!(field, "ports");
                assert_eq!(
                    source,
                    CodecError::InvalidNumber {
                        value: "http".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_environment_shape() {
        let err = ingest("services:\n  web:\n    environment: 42\n").unwrap_err();
        assert!(matches!(err, Error::FieldDecode { field: "environment", .. }));
    }

    #[test]
    fn test_malformed_yaml_is_structural() {
        let err = ingest("services: [unclosed").unwrap_err();
        assert!(matches!(err, Error::Structural { format: "compose", .. }));
    }
}
