//! Format registry
//!
//! Maps format names to ingesters and emitters. Inbound and outbound names
//! are separate namespaces: `compose` can name both an ingester and an
//! emitter.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Emitter, Ingester};
use crate::error::{Direction, Error, Result};

/// Registry of inbound and outbound adapters.
///
/// # Example
///
/// ```ignore
/// use podshift_convert::FormatRegistry;
///
/// let mut registry = FormatRegistry::new();
/// registry.register_ingester(MyIngester);
/// registry.register_emitter(MyEmitter);
///
/// let ingester = registry.ingester("my-format")?;
/// let emitter = registry.emitter("my-format")?;
/// ```
#[derive(Default)]
pub struct FormatRegistry {
    ingesters: HashMap<&'static str, Arc<dyn Ingester>>,
    emitters: HashMap<&'static str, Arc<dyn Emitter>>,
}

impl FormatRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ingester under its `format_name()`, replacing any previous
    /// one with the same name.
    pub fn register_ingester(&mut self, ingester: impl Ingester + 'static) {
        let name = ingester.format_name();
        self.ingesters.insert(name, Arc::new(ingester));
    }

    /// Register an emitter under its `format_name()`, replacing any previous
    /// one with the same name.
    pub fn register_emitter(&mut self, emitter: impl Emitter + 'static) {
        let name = emitter.format_name();
        self.emitters.insert(name, Arc::new(emitter));
    }

    /// Look up an ingester.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFormat`] listing the registered input formats.
    pub fn ingester(&self, name: &str) -> Result<Arc<dyn Ingester>> {
        self.ingesters
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_format(Direction::Input, name, &self.input_formats()))
    }

    /// Look up an emitter.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFormat`] listing the registered output formats.
    pub fn emitter(&self, name: &str) -> Result<Arc<dyn Emitter>> {
        self.emitters
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_format(Direction::Output, name, &self.output_formats()))
    }

    /// Registered input format names, sorted.
    #[must_use]
    pub fn input_formats(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.ingesters.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Registered output format names, sorted.
    #[must_use]
    pub fn output_formats(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.emitters.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Describe every registered adapter, inbound first, each side sorted by
    /// name.
    #[must_use]
    pub fn info(&self) -> Vec<FormatInfo> {
        let mut inbound: Vec<_> = self
            .ingesters
            .values()
            .map(|i| FormatInfo {
                format: i.format_name(),
                direction: Direction::Input,
                description: i.description(),
            })
            .collect();
        inbound.sort_by_key(|i| i.format);

        let mut outbound: Vec<_> = self
            .emitters
            .values()
            .map(|e| FormatInfo {
                format: e.format_name(),
                direction: Direction::Output,
                description: e.description(),
            })
            .collect();
        outbound.sort_by_key(|i| i.format);

        inbound.extend(outbound);
        inbound
    }
}

/// Information about a registered adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    /// Format name (CLI flag value)
    pub format: &'static str,
    /// Inbound or outbound
    pub direction: Direction,
    /// Human-readable description
    pub description: &'static str,
}

/// Builder for a [`FormatRegistry`].
#[derive(Default)]
pub struct FormatRegistryBuilder {
    registry: FormatRegistry,
}

impl FormatRegistryBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ingester.
    #[must_use]
    pub fn with_ingester(mut self, ingester: impl Ingester + 'static) -> Self {
        self.registry.register_ingester(ingester);
        self
    }

    /// Add an emitter.
    #[must_use]
    pub fn with_emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.registry.register_emitter(emitter);
        self
    }

    /// Build the registry.
    #[must_use]
    pub fn build(self) -> FormatRegistry {
        self.registry
    }
}
