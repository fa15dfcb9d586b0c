//! Canonical ordering applied before emitting.
//!
//! Native documents list containers, ports and volumes in whatever order
//! their authors chose. Emitters see a group sorted the same way every time,
//! so identical input always produces byte-identical output.
//!
//! Key/value fields need no work here: the IR stores them in `BTreeMap`s.

use crate::ir::{Container, PodGroup};

/// Return a copy of `group` in canonical order.
///
/// - containers by name
/// - ports by container port, then host port, protocol, host IP and name
/// - volumes by container path, then host path and read-only flag
/// - exposed ports ascending
/// - `volumes_from` by source container
///
/// Lists whose order carries meaning (DNS servers, health checks, networks)
/// are left as written.
#[must_use]
pub fn canonicalize(group: &PodGroup) -> PodGroup {
    let mut group = group.clone();
    sort_containers(&mut group.containers);
    for container in &mut group.containers {
        canonicalize_container(container);
    }
    group
}

/// Sort containers by name.
pub fn sort_containers(containers: &mut [Container]) {
    containers.sort_by(|a, b| a.name.cmp(&b.name));
}

fn canonicalize_container(container: &mut Container) {
    container.ports.sort_by(|a, b| {
        (a.container_port, a.host_port, a.protocol, &a.host_ip, &a.name)
            .cmp(&(b.container_port, b.host_port, b.protocol, &b.host_ip, &b.name))
    });
    container.volumes.sort_by(|a, b| {
        (&a.container, &a.host, a.read_only).cmp(&(&b.container, &b.host, b.read_only))
    });
    container.expose.sort_unstable();
    container.volumes_from.sort();
}
