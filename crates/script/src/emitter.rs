//! Script Emitter
//!
//! Transforms a [`PodGroup`] into `docker run` invocations.

use podshift_convert::codec;
use podshift_convert::{Container, Emitter, Error, PodGroup, Result};
use std::fmt::{self, Write as _};

use crate::FORMAT;

const FLAG_INDENT: &str = "    ";
const COMMAND_INDENT: &str = "        ";

/// `docker run` script emitter
///
/// Each container becomes one block. Flags appear in a fixed order:
///
/// | Flag | IR Field |
/// |------|----------|
/// | `--cpu-shares=` | `cpu_shares` |
/// | `--dns`, `--dns-search` | `dns`, `dns_search` |
/// | `--entrypoint=` | `entrypoint` |
/// | `--env-file`, `--env` | `env_files`, `environment` |
/// | `--expose`, `--hostname=` | `expose`, `hostname` |
/// | `--label`, `--link` | `labels`, `links` |
/// | `--log-driver`, `--log-opt` | `logging` |
/// | `--memory=<n>b` | `memory` |
/// | `--name`, `--net-alias`, `--net`, `--pid` | `name`, `networks`, `network_mode`, `pid` |
/// | `--publish`, `--privileged` | `ports`, `privileged` |
/// | `--stop-signal=`, `--user=` | `stop_signal`, `user` |
/// | `--volume`, `--volumes-from`, `--workdir=` | `volumes`, `volumes_from`, `working_dir` |
///
/// The image follows the flags and the command, when present, goes on its own
/// line below it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptEmitter;

impl ScriptEmitter {
    /// Create a new script emitter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Emitter for ScriptEmitter {
    #[tracing::instrument(name = "script_emit", skip_all, fields(containers = group.containers.len()))]
    fn emit(&self, group: &PodGroup) -> Result<String> {
        if !group.global_labels.is_empty() {
            tracing::warn!(
                labels = group.global_labels.len(),
                "docker run has no group-level labels; dropping them"
            );
        }

        let mut script = String::new();
        for container in &group.containers {
            warn_unsupported(container);
            render_container(&mut script, group, container)
                .map_err(|e| Error::serialization(FORMAT, e))?;
        }
        Ok(script)
    }

    fn format_name(&self) -> &'static str {
        FORMAT
    }

    fn file_extension(&self) -> &'static str {
        "sh"
    }

    fn description(&self) -> &'static str {
        "Shell script of docker run commands"
    }
}

fn warn_unsupported(container: &Container) {
    if container.build.is_some() {
        tracing::warn!(container = %container.name, "docker run cannot build images; dropping build");
    }
    if !container.health_checks.is_empty() {
        tracing::warn!(container = %container.name, "Dropping health checks from run script");
    }
}

/// Appends `    <flag> \` lines for one container.
struct Block<'a> {
    out: &'a mut String,
}

impl Block<'_> {
    fn flag(&mut self, flag: fmt::Arguments<'_>) -> fmt::Result {
        writeln!(self.out, "{FLAG_INDENT}{flag} \\")
    }
}

fn render_container(out: &mut String, group: &PodGroup, container: &Container) -> fmt::Result {
    writeln!(out, "######## {} ########", container.name)?;
    writeln!(out, "docker run \\")?;

    let mut block = Block { out: &mut *out };

    if let Some(shares) = container.cpu_shares.filter(|n| *n > 0) {
        block.flag(format_args!("--cpu-shares={shares}"))?;
    }
    for server in &container.dns {
        block.flag(format_args!("--dns {server}"))?;
    }
    for domain in &container.dns_search {
        block.flag(format_args!("--dns-search {domain}"))?;
    }
    if let Some(entrypoint) = non_empty(container.entrypoint.as_deref()) {
        block.flag(format_args!("--entrypoint={entrypoint}"))?;
    }
    for file in &container.env_files {
        block.flag(format_args!("--env-file {file}"))?;
    }
    for (key, value) in &container.environment {
        block.flag(format_args!("--env {key}={value}"))?;
    }
    for port in &container.expose {
        block.flag(format_args!("--expose {port}"))?;
    }
    if let Some(hostname) = non_empty(container.hostname.as_deref()) {
        block.flag(format_args!("--hostname={hostname}"))?;
    }
    for (key, value) in &container.labels {
        block.flag(format_args!("--label {key}={value}"))?;
    }
    for link in &container.links {
        block.flag(format_args!("--link {link}"))?;
    }
    if let Some(logging) = &container.logging {
        block.flag(format_args!("--log-driver {}", logging.driver))?;
        for (key, value) in &logging.options {
            block.flag(format_args!("--log-opt {key}={value}"))?;
        }
    }
    if let Some(memory) = container.memory.filter(|n| *n > 0) {
        block.flag(format_args!("--memory={memory}b"))?;
    }
    if !container.name.is_empty() {
        block.flag(format_args!("--name {}", container.name))?;
    }
    for network in &container.networks {
        block.flag(format_args!("--net-alias {network}"))?;
    }
    let host = |enabled: bool| enabled.then_some("host");
    if let Some(mode) = non_empty(container.network_mode.as_deref()).or_else(|| host(group.host_network)) {
        block.flag(format_args!("--net {mode}"))?;
    }
    if let Some(pid) = non_empty(container.pid.as_deref()).or_else(|| host(group.host_pid)) {
        block.flag(format_args!("--pid {pid}"))?;
    }
    for port in container.ports.iter().filter_map(codec::port::encode) {
        block.flag(format_args!("--publish {port}"))?;
    }
    if container.privileged {
        block.flag(format_args!("--privileged"))?;
    }
    if let Some(signal) = non_empty(container.stop_signal.as_deref()) {
        block.flag(format_args!("--stop-signal={signal}"))?;
    }
    if let Some(user) = non_empty(container.user.as_deref()) {
        block.flag(format_args!("--user={user}"))?;
    }
    for volume in &container.volumes {
        block.flag(format_args!("--volume {}", codec::volume::encode(volume)))?;
    }
    for source in &container.volumes_from {
        block.flag(format_args!("--volumes-from {source}"))?;
    }
    if let Some(dir) = non_empty(container.working_dir.as_deref()) {
        block.flag(format_args!("--workdir={dir}"))?;
    }

    let image = container.image.as_deref().unwrap_or_default();
    match non_empty(container.command.as_deref()) {
        Some(command) => writeln!(out, "{FLAG_INDENT}{image} \\\n{COMMAND_INDENT}{command}"),
        None => writeln!(out, "{FLAG_INDENT}{image}"),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use podshift_convert::{HealthCheck, Logging, PortMapping, Protocol, Volume};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn emit(group: &PodGroup) -> String {
        ScriptEmitter::new().emit(group).unwrap()
    }

    #[test]
    fn test_minimal_container() {
        let group = PodGroup::new().with_container(Container::new("web").with_image("nginx"));
        assert_eq!(
            emit(&group),
            "######## web ########\ndocker run \\\n    --name web \\\n    nginx\n"
        );
    }

    #[test]
    fn test_command_on_its_own_line() {
        let container = Container {
            command: Some("nginx -g daemon off;".to_string()),
            ..Container::new("web").with_image("nginx")
        };
        let script = emit(&PodGroup::new().with_container(container));
        assert!(script.ends_with("    nginx \\\n        nginx -g daemon off;\n"));
    }

    #[test]
    fn test_flag_order() {
        let container = Container {
            cpu_shares: Some(512),
            dns: vec!["8.8.8.8".to_string()],
            entrypoint: Some("/entry.sh".to_string()),
            environment: BTreeMap::from([
                ("B".to_string(), "2".to_string()),
                ("A".to_string(), "1".to_string()),
            ]),
            expose: vec![9000],
            hostname: Some("box".to_string()),
            logging: Some(Logging {
                driver: "json-file".to_string(),
                options: BTreeMap::from([("max-size".to_string(), "10m".to_string())]),
            }),
            memory: Some(64 << 20),
            networks: vec!["front".to_string()],
            ports: vec![PortMapping {
                protocol: Protocol::Udp,
                ..PortMapping::published(53, 53)
            }],
            privileged: true,
            stop_signal: Some("SIGINT".to_string()),
            user: Some("app".to_string()),
            volumes: vec![Volume {
                read_only: true,
                ..Volume::bind("/srv", "/data")
            }],
            volumes_from: vec!["store:ro".to_string()],
            working_dir: Some("/app".to_string()),
            ..Container::new("web").with_image("nginx")
        };
        let script = emit(&PodGroup::new().with_container(container));

        let expected = "\
######## web ########
docker run \\
    --cpu-shares=512 \\
    --dns 8.8.8.8 \\
    --entrypoint=/entry.sh \\
    --env A=1 \\
    --env B=2 \\
    --expose 9000 \\
    --hostname=box \\
    --log-driver json-file \\
    --log-opt max-size=10m \\
    --memory=67108864b \\
    --name web \\
    --net-alias front \\
    --publish 53:53/udp \\
    --privileged \\
    --stop-signal=SIGINT \\
    --user=app \\
    --volume /srv:/data:ro \\
    --volumes-from store:ro \\
    --workdir=/app \\
    nginx
";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_containers_rendered_in_group_order() {
        let group = PodGroup::new()
            .with_container(Container::new("zeta").with_image("a"))
            .with_container(Container::new("alpha").with_image("b"));
        let script = emit(&group);
        assert!(script.find("######## zeta").unwrap() < script.find("######## alpha").unwrap());
    }

    #[test]
    fn test_host_namespaces_from_group() {
        let group = PodGroup {
            host_network: true,
            host_pid: true,
            ..PodGroup::new().with_container(Container::new("web").with_image("nginx"))
        };
        let script = emit(&group);
        assert!(script.contains("    --net host \\\n    --pid host \\\n"));
    }

    #[test]
    fn test_zero_memory_and_unset_ports_skipped() {
        let container = Container {
            memory: Some(0),
            ports: vec![PortMapping::default()],
            health_checks: vec![HealthCheck::exec("true")],
            ..Container::new("web").with_image("nginx")
        };
        let script = emit(&PodGroup::new().with_container(container));
        assert!(!script.contains("--memory"));
        assert!(!script.contains("--publish"));
    }

    proptest! {
        #[test]
        fn prop_every_flag_line_continues(names in prop::collection::btree_set("[a-z]{1,8}", 1..5)) {
            let group = names.iter().fold(PodGroup::new(), |group, name| {
                group.with_container(Container::new(name.clone()).with_image("busybox"))
            });
            let script = emit(&group);
            prop_assert_eq!(script.matches("docker run \\\n").count(), names.len());
            for line in script.lines().filter(|l| l.starts_with("    --")) {
                prop_assert!(line.ends_with(" \\"));
            }
        }
    }
}
