//! Integration tests for the compose adapter

use podshift_compose::{ComposeEmitter, ComposeIngester};
use podshift_convert::{Emitter, Ingester, PortMapping};

const FIXTURE: &str = include_str!("fixtures/docker-compose.yaml");

#[test]
fn test_fixture_ingests() {
    let group = ComposeIngester::new().ingest_str(FIXTURE).unwrap();

    let names: Vec<_> = group.containers.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["api", "data", "web"]);

    let web = group.container("web").unwrap();
    assert_eq!(web.memory, Some(256 << 20));
    assert_eq!(web.cpu_shares, Some(512));
    assert_eq!(web.ports.len(), 3);
    assert!(web.ports.contains(&PortMapping::container(9000)));
    assert_eq!(web.environment.get("DEBUG").map(String::as_str), Some(""));
    assert_eq!(
        web.logging.as_ref().and_then(|l| l.options.get("max-file")).map(String::as_str),
        Some("3")
    );

    let api = group.container("api").unwrap();
    assert_eq!(api.entrypoint.as_deref(), Some("/usr/bin/tini --"));
    assert_eq!(api.command.as_deref(), Some("node server.js"));
    assert_eq!(api.dns_search, vec!["example.internal"]);
    assert_eq!(api.env_files, vec![".env"]);
    assert_eq!(
        api.health_checks[0].exec_command(),
        Some("curl -f http://localhost:3000/health")
    );

    assert!(group.container("data").unwrap().privileged);
}

#[test]
fn test_round_trip_preserves_ir() {
    let first = ComposeIngester::new().ingest_str(FIXTURE).unwrap();
    let yaml = ComposeEmitter::new().emit(&first).unwrap();
    let second = ComposeIngester::new().ingest_str(&yaml).unwrap();

    assert_eq!(
        podshift_convert::canonicalize(&first),
        podshift_convert::canonicalize(&second)
    );
}

#[test]
fn test_emit_is_deterministic() {
    let group = ComposeIngester::new().ingest_str(FIXTURE).unwrap();
    let emitter = ComposeEmitter::new();
    assert_eq!(emitter.emit(&group).unwrap(), emitter.emit(&group).unwrap());
}

#[test]
fn test_ingest_order_does_not_change_output() {
    let forward = "\
services:
  web:
    image: nginx
    environment:
      A: '1'
      B: '2'
    labels:
      owner: shop
      tier: frontend
    ports:
      - '80:8080'
      - '443:8443'
    volumes:
      - /srv/a:/a
      - /srv/b:/b
  api:
    image: example/api
";
    let permuted = "\
services:
  api:
    image: example/api
  web:
    volumes:
      - /srv/b:/b
      - /srv/a:/a
    ports:
      - '443:8443'
      - '80:8080'
    labels:
      tier: frontend
      owner: shop
    environment:
      B: '2'
      A: '1'
    image: nginx
";

    let emitter = ComposeEmitter::new();
    let a = emitter.emit(&ComposeIngester::new().ingest_str(forward).unwrap()).unwrap();
    let b = emitter.emit(&ComposeIngester::new().ingest_str(permuted).unwrap()).unwrap();
    assert_eq!(a, b);
    assert!(a.find("  api:").unwrap() < a.find("  web:").unwrap());
}
