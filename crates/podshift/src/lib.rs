//! podshift: convert container workload definitions between formats
//!
//! | Format | Ingest | Emit |
//! |--------|--------|------|
//! | `compose` | yes | yes |
//! | `ecs` | yes | yes |
//! | `k8s` | yes | no |
//! | `script` | no | yes |
//!
//! # Example
//!
//! ```ignore
//! let registry = podshift::default_registry();
//! let converter = podshift::Converter::new(&registry, "compose", "ecs")?;
//! let task_json = converter.run(Box::new(std::fs::File::open("docker-compose.yaml")?))?;
//! ```

use std::io::Read;
use std::sync::Arc;

use podshift_compose::{ComposeEmitter, ComposeIngester};
use podshift_convert::{Emitter, FormatRegistry, FormatRegistryBuilder, Ingester, Result};
use podshift_ecs::{EcsEmitter, EcsIngester};
use podshift_kube::KubeIngester;
use podshift_script::ScriptEmitter;

pub use podshift_convert as convert;

/// Registry with every built-in format.
#[must_use]
pub fn default_registry() -> FormatRegistry {
    FormatRegistryBuilder::new()
        .with_ingester(ComposeIngester::new())
        .with_ingester(EcsIngester::new())
        .with_ingester(KubeIngester::new())
        .with_emitter(ComposeEmitter::new())
        .with_emitter(EcsEmitter::new())
        .with_emitter(ScriptEmitter::new())
        .build()
}

/// A resolved ingester/emitter pair.
///
/// Both names are looked up on construction, so an unknown format is reported
/// before any input is read.
#[derive(Clone)]
pub struct Converter {
    ingester: Arc<dyn Ingester>,
    emitter: Arc<dyn Emitter>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("input", &self.ingester.format_name())
            .field("output", &self.emitter.format_name())
            .finish()
    }
}

impl Converter {
    /// Resolve `input` and `output` against the registry.
    ///
    /// # Errors
    /// Returns [`convert::Error::UnknownFormat`] for either name.
    pub fn new(registry: &FormatRegistry, input: &str, output: &str) -> Result<Self> {
        Ok(Self {
            ingester: registry.ingester(input)?,
            emitter: registry.emitter(output)?,
        })
    }

    /// Read one document from `reader` and render it in the output format.
    ///
    /// # Errors
    /// Propagates ingest and emit failures unchanged.
    #[tracing::instrument(
        name = "convert",
        skip_all,
        fields(input = self.ingester.format_name(), output = self.emitter.format_name())
    )]
    pub fn run(&self, reader: Box<dyn Read + '_>) -> Result<String> {
        let group = self.ingester.ingest(reader)?;
        tracing::debug!(
            containers = group.containers.len(),
            name = ?group.name,
            "Ingested pod group"
        );
        self.emitter.emit(&group)
    }

    /// Convert an in-memory document.
    ///
    /// # Errors
    /// Propagates ingest and emit failures unchanged.
    pub fn run_str(&self, document: &str) -> Result<String> {
        self.run(Box::new(document.as_bytes()))
    }
}

/// One-shot conversion with the default registry.
///
/// # Errors
/// Returns an error for an unknown format name or a failed conversion.
pub fn convert(input: &str, output: &str, reader: Box<dyn Read + '_>) -> Result<String> {
    Converter::new(&default_registry(), input, output)?.run(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use podshift_convert::{Direction, Error};

    #[test]
    fn test_default_registry_formats() {
        let registry = default_registry();
        assert_eq!(registry.input_formats(), vec!["compose", "ecs", "k8s"]);
        assert_eq!(registry.output_formats(), vec!["compose", "ecs", "script"]);
    }

    #[test]
    fn test_unknown_input_format() {
        let err = Converter::new(&default_registry(), "swarm", "ecs").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownFormat {
                direction: Direction::Input,
                ..
            }
        ));
    }

    #[test]
    fn test_kubernetes_is_not_an_output() {
        let err = Converter::new(&default_registry(), "compose", "k8s").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownFormat {
                direction: Direction::Output,
                ..
            }
        ));
    }

    #[test]
    fn test_compose_to_script() {
        let converter = Converter::new(&default_registry(), "compose", "script").unwrap();
        let script = converter
            .run_str("services:\n  web:\n    image: nginx\n    ports: ['8080:80']\n")
            .unwrap();
        assert!(script.starts_with("######## web ########\n"));
        assert!(script.contains("    --publish 8080:80 \\\n"));
    }

    #[test]
    fn test_convert_helper() {
        let json = convert(
            "compose",
            "ecs",
            Box::new("services:\n  web:\n    image: nginx\n".as_bytes()),
        )
        .unwrap();
        assert!(json.contains("\"containerDefinitions\""));
    }
}
