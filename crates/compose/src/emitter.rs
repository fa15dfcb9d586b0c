//! Compose Emitter
//!
//! Transforms a [`PodGroup`] into a compose file.

use podshift_convert::codec::{self, Scalar};
use podshift_convert::{Container, Emitter, Error, HealthCheck, PodGroup, Probe, Result, canonicalize};
use serde_yaml::Value;

use crate::FORMAT;
use crate::schema::{ComposeFile, Healthcheck, LoggingSection, Service};

/// Schema version written when none is configured.
pub const DEFAULT_VERSION: &str = "2";

/// Docker Compose emitter
///
/// # IR to Compose Mapping
///
/// | IR Field | Compose YAML |
/// |----------|--------------|
/// | `container.name` | service key |
/// | `container.command` | `command` (string) |
/// | `container.memory` | `mem_limit` (bytes) |
/// | `container.ports` | `ports` (`[ip:][host:]container[/udp]`) |
/// | `container.volumes` | `volumes` (`[host:]container[:ro]`) |
/// | `container.environment` | `environment` (mapping) |
/// | `container.health_checks[0]` | `healthcheck` (exec only) |
/// | `group.host_network` | `network_mode: host` |
/// | `group.host_pid` | `pid: host` |
#[derive(Debug, Clone)]
pub struct ComposeEmitter {
    /// Value written to the top-level `version` key
    pub version: String,
}

impl Default for ComposeEmitter {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl ComposeEmitter {
    /// Create a new compose emitter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema version written to the file
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    fn build_file(&self, group: &PodGroup) -> Result<ComposeFile> {
        if !group.global_labels.is_empty() {
            tracing::warn!(
                labels = group.global_labels.len(),
                "Compose has no group-level labels; dropping them"
            );
        }

        let services = group
            .containers
            .iter()
            .map(|container| Ok((container.name.clone(), build_service(group, container)?)))
            .collect::<Result<_>>()?;

        Ok(ComposeFile {
            version: Some(Scalar::from(self.version.as_str())),
            services,
        })
    }
}

fn build_service(group: &PodGroup, container: &Container) -> Result<Service> {
    let network_mode = container
        .network_mode
        .clone()
        .or_else(|| group.host_network.then(|| "host".to_string()));
    let pid = container
        .pid
        .clone()
        .or_else(|| group.host_pid.then(|| "host".to_string()));

    let build = container
        .build
        .as_ref()
        .map(|build| to_value(&codec::build::encode(build)))
        .transpose()?;

    Ok(Service {
        build,
        command: container.command.clone().map(Value::from),
        cpu_shares: container.cpu_shares.filter(|n| *n > 0).map(Scalar::from),
        dns: string_list(&container.dns),
        dns_search: string_list(&container.dns_search),
        entrypoint: container.entrypoint.clone().map(Value::from),
        env_file: string_list(&container.env_files),
        environment: mapping(&container.environment),
        expose: container
            .expose
            .iter()
            .map(|port| Scalar::from(u64::from(*port)))
            .collect(),
        healthcheck: build_healthcheck(container),
        hostname: container.hostname.clone(),
        image: container.image.clone(),
        labels: mapping(&container.labels),
        links: container.links.clone(),
        logging: container.logging.as_ref().map(|logging| LoggingSection {
            driver: Some(logging.driver.clone()).filter(|d| !d.is_empty()),
            options: logging
                .options
                .iter()
                .map(|(k, v)| (k.clone(), Scalar::from(v.as_str())))
                .collect(),
        }),
        mem_limit: container.memory.filter(|n| *n > 0).map(Scalar::from),
        networks: string_list(&container.networks),
        network_mode,
        pid,
        ports: container
            .ports
            .iter()
            .filter_map(codec::port::encode)
            .map(Scalar::from)
            .collect(),
        privileged: container.privileged,
        pull_policy: container.pull_policy.clone(),
        stop_signal: container.stop_signal.clone(),
        user: container.user.clone(),
        volumes: container
            .volumes
            .iter()
            .map(|volume| Scalar::from(codec::volume::encode(volume)))
            .collect(),
        volumes_from: container.volumes_from.clone(),
        working_dir: container.working_dir.clone(),
    })
}

fn to_value(value: &impl serde::Serialize) -> Result<Value> {
    serde_yaml::to_value(value).map_err(|e| Error::serialization(FORMAT, e))
}

/// Compose holds a single health check and only runs commands.
fn build_healthcheck(container: &Container) -> Option<Healthcheck> {
    let mut exec_checks = container.health_checks.iter().filter(|check| {
        if matches!(check.probe, Probe::Http(_)) {
            tracing::warn!(
                container = %container.name,
                "Compose health checks only run commands; dropping HTTP probe"
            );
            return false;
        }
        true
    });

    let check: &HealthCheck = exec_checks.next()?;
    let command = check.exec_command()?;
    if exec_checks.next().is_some() {
        tracing::warn!(
            container = %container.name,
            "Compose supports one health check; keeping the first"
        );
    }

    Some(Healthcheck {
        test: Some(Value::Sequence(
            codec::health::exec_to_test(command)
                .into_iter()
                .map(Value::from)
                .collect(),
        )),
        interval: check.interval.map(codec::health::format_duration),
        timeout: check.timeout.map(codec::health::format_duration),
        retries: check.failure_threshold.map(|n| Scalar::from(u64::from(n))),
        disable: false,
    })
}

fn string_list(items: &[String]) -> Option<Value> {
    (!items.is_empty()).then(|| Value::Sequence(items.iter().cloned().map(Value::from).collect()))
}

fn mapping(map: &std::collections::BTreeMap<String, String>) -> Option<Value> {
    (!map.is_empty()).then(|| {
        Value::Mapping(
            map.iter()
                .map(|(k, v)| (Value::from(k.clone()), Value::from(v.clone())))
                .collect(),
        )
    })
}

impl Emitter for ComposeEmitter {
    #[tracing::instrument(name = "compose_emit", skip_all, fields(containers = group.containers.len()))]
    fn emit(&self, group: &PodGroup) -> Result<String> {
        let file = self.build_file(&canonicalize(group))?;
        serde_yaml::to_string(&file).map_err(|e| Error::serialization(FORMAT, e))
    }

    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn file_extension(&self) -> &'static str {
        "yaml"
    }

    fn description(&self) -> &'static str {
        "Docker Compose file (YAML)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podshift_convert::{BuildContext, HttpProbe, PortMapping, Protocol, Volume};
    use std::collections::BTreeMap;

    fn emit(group: &PodGroup) -> String {
        ComposeEmitter::new().emit(group).unwrap()
    }

    #[test]
    fn test_version_and_service_keys() {
        let group = PodGroup::new()
            .with_container(Container::new("web").with_image("nginx"))
            .with_container(Container::new("db").with_image("postgres"));
        let yaml = emit(&group);

        assert!(yaml.starts_with("version: '2'\n"));
        let db = yaml.find("  db:").unwrap();
        let web = yaml.find("  web:").unwrap();
        assert!(db < web);
    }

    #[test]
    fn test_with_version() {
        let yaml = ComposeEmitter::new()
            .with_version("3.8")
            .emit(&PodGroup::new())
            .unwrap();
        assert!(yaml.starts_with("version: '3.8'\n"));
    }

    #[test]
    fn test_ports_and_volumes_encoded() {
        let container = Container {
            ports: vec![
                PortMapping {
                    protocol: Protocol::Udp,
                    ..PortMapping::published(53, 53)
                },
                PortMapping::default(),
            ],
            volumes: vec![Volume {
                read_only: true,
                ..Volume::bind("/var/lib/data", "/data")
            }],
            ..Container::new("web")
        };
        let yaml = emit(&PodGroup::new().with_container(container));

        assert!(yaml.contains("53:53/udp"));
        assert!(yaml.contains("/var/lib/data:/data:ro"));
        assert_eq!(yaml.matches("ports:").count(), 1);
        assert!(!yaml.contains("- ''"));
    }

    #[test]
    fn test_environment_as_mapping() {
        let container = Container {
            environment: BTreeMap::from([
                ("B".to_string(), "2".to_string()),
                ("A".to_string(), "1".to_string()),
            ]),
            ..Container::new("web")
        };
        let yaml = emit(&PodGroup::new().with_container(container));
        assert!(yaml.contains("    environment:\n      A: '1'\n      B: '2'\n"));
    }

    #[test]
    fn test_host_network_becomes_network_mode() {
        let group = PodGroup {
            host_network: true,
            ..PodGroup::new().with_container(Container::new("web"))
        };
        assert!(emit(&group).contains("network_mode: host"));
    }

    #[test]
    fn test_http_probe_dropped() {
        let container = Container {
            health_checks: vec![HealthCheck {
                probe: Probe::Http(HttpProbe {
                    path: "/healthz".to_string(),
                    port: 8080,
                    ..HttpProbe::default()
                }),
                interval: None,
                timeout: None,
                failure_threshold: None,
            }],
            ..Container::new("web")
        };
        assert!(!emit(&PodGroup::new().with_container(container)).contains("healthcheck"));
    }

    #[test]
    fn test_exec_healthcheck() {
        let container = Container {
            health_checks: vec![HealthCheck {
                interval: Some(30),
                failure_threshold: Some(3),
                ..HealthCheck::exec("pg_isready")
            }],
            ..Container::new("db")
        };
        let yaml = emit(&PodGroup::new().with_container(container));
        assert!(yaml.contains("- CMD-SHELL\n"));
        assert!(yaml.contains("- pg_isready\n"));
        assert!(yaml.contains("interval: 30s"));
        assert!(yaml.contains("retries: 3"));
    }

    #[test]
    fn test_build_context_emitted() {
        let container = Container {
            build: Some(BuildContext {
                context: "./web".to_string(),
                dockerfile: Some("Dockerfile.prod".to_string()),
                args: BTreeMap::from([("RELEASE".to_string(), "stable".to_string())]),
            }),
            ..Container::new("web")
        };
        let yaml = emit(&PodGroup::new().with_container(container));
        assert!(yaml.contains("    build:\n      context: ./web\n      dockerfile: Dockerfile.prod\n"));
        assert!(yaml.contains("RELEASE: stable"));
    }

    struct Unserializable;

    impl serde::Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot encode"))
        }
    }

    #[test]
    fn test_value_error_is_serialization_error() {
        let err = to_value(&Unserializable).unwrap_err();
        assert!(matches!(
            err,
            Error::Serialization { format: "compose", ref message } if message.contains("cannot encode")
        ));
    }

    #[test]
    fn test_format_name() {
        let emitter = ComposeEmitter::new();
        assert_eq!(emitter.format_name(), "compose");
        assert_eq!(emitter.file_extension(), "yaml");
    }
}
