//! Volume codec and the named-volume registry.
//!
//! Inline volumes look like `container`, `host:container` or
//! `host:container:ro`. Formats that refer to volumes by name (ECS task
//! definitions, Kubernetes pods) go through a [`VolumeRegistry`].

use std::collections::BTreeMap;

use crate::error::CodecError;
use crate::ir::Volume;

/// Decode an inline volume string.
///
/// Only the literal `ro` in the third slot marks the volume read-only; any
/// other mode is ignored.
///
/// # Errors
/// Returns [`CodecError::Empty`] for an empty string and
/// [`CodecError::SegmentCount`] for more than three parts.
pub fn decode(text: &str) -> Result<Volume, CodecError> {
    if text.is_empty() {
        return Err(CodecError::Empty);
    }

    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [container] => Ok(Volume {
            host: None,
            container: (*container).to_string(),
            read_only: false,
        }),
        [host, container] => Ok(Volume::bind(*host, *container)),
        [host, container, mode] => Ok(Volume {
            read_only: *mode == "ro",
            ..Volume::bind(*host, *container)
        }),
        _ => Err(CodecError::SegmentCount {
            value: text.to_string(),
            found: parts.len(),
            expected: "1 to 3",
        }),
    }
}

/// Encode a volume as `[host:]container[:ro]`.
#[must_use]
pub fn encode(volume: &Volume) -> String {
    let parts = [
        volume.host.as_deref().unwrap_or_default(),
        volume.container.as_str(),
        if volume.read_only { "ro" } else { "" },
    ];
    parts.join(":").trim_matches(':').to_string()
}

/// Generate a registry name from a path: `/` becomes `-`, then leading and
/// trailing `-` are trimmed.
///
/// ```
/// assert_eq!(podshift_convert::codec::volume::registry_name("/var/lib/data"), "var-lib-data");
/// ```
#[must_use]
pub fn registry_name(path: &str) -> String {
    path.replace('/', "-").trim_matches('-').to_string()
}

/// A named-volume table: symbolic name to optional host path.
///
/// On the emit side it accumulates across every container of a group, so two
/// containers mounting the same host path share one entry. Entries are never
/// replaced: when a generated name is already held by a different host path
/// (or by a host-less volume), a `-2`, `-3`, ... suffix is appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeRegistry {
    entries: BTreeMap<String, Option<String>>,
}

impl VolumeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry read from a native volume table.
    pub fn insert(&mut self, name: impl Into<String>, host: Option<String>) {
        self.entries.insert(name.into(), host);
    }

    /// Register a volume for emit and return the name its mount should use.
    ///
    /// The name is generated from the host path, or from the container path
    /// when the volume has no host path.
    pub fn register(&mut self, volume: &Volume) -> String {
        let base = registry_name(volume.host.as_deref().unwrap_or(&volume.container));
        let mut name = base.clone();
        let mut suffix = 1;
        while let Some(existing) = self.entries.get(&name) {
            if *existing == volume.host {
                return name;
            }
            suffix += 1;
            name = format!("{base}-{suffix}");
        }
        self.entries.insert(name.clone(), volume.host.clone());
        name
    }

    /// Host path for a name. Unknown names and host-less entries resolve to
    /// `None`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(Option::as_deref)
    }

    /// Whether a name has been registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the registry, yielding entries sorted by name.
    pub fn into_entries(self) -> impl Iterator<Item = (String, Option<String>)> {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_shapes() {
        assert_eq!(
            decode("/data").unwrap(),
            Volume {
                host: None,
                container: "/data".to_string(),
                read_only: false,
            }
        );
        assert_eq!(decode("/var/lib:/data").unwrap(), Volume::bind("/var/lib", "/data"));

        let ro = decode("/var/lib:/data:ro").unwrap();
        assert!(ro.read_only);
        assert_eq!(ro.host.as_deref(), Some("/var/lib"));
    }

    #[test]
    fn test_only_literal_ro_is_read_only() {
        assert!(!decode("/a:/b:rw").unwrap().read_only);
        assert!(!decode("/a:/b:RO").unwrap().read_only);
        assert!(!decode("/a:/b:z").unwrap().read_only);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode(""), Err(CodecError::Empty));
        assert!(matches!(
            decode("/a:/b:ro:extra"),
            Err(CodecError::SegmentCount { found: 4, .. })
        ));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(&Volume::bind("/var/lib", "/data")), "/var/lib:/data");
        let ro = Volume {
            read_only: true,
            ..Volume::bind("/var/lib", "/data")
        };
        assert_eq!(encode(&ro), "/var/lib:/data:ro");

        let anonymous = Volume {
            host: None,
            container: "/cache".to_string(),
            read_only: false,
        };
        assert_eq!(encode(&anonymous), "/cache");
    }

    #[test]
    fn test_registry_name() {
        assert_eq!(registry_name("/var/lib/data"), "var-lib-data");
        assert_eq!(registry_name("/srv/"), "srv");
        assert_eq!(registry_name("relative/path"), "relative-path");
    }

    #[test]
    fn test_registry_shares_entries() {
        let mut registry = VolumeRegistry::new();
        let a = registry.register(&Volume::bind("/var/lib/data", "/data"));
        let b = registry.register(&Volume {
            read_only: true,
            ..Volume::bind("/var/lib/data", "/mnt")
        });

        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("var-lib-data"), Some("/var/lib/data"));
    }

    #[test]
    fn test_registry_host_less_volume() {
        let mut registry = VolumeRegistry::new();
        let name = registry.register(&Volume {
            host: None,
            container: "/scratch".to_string(),
            read_only: false,
        });

        assert_eq!(name, "scratch");
        assert!(registry.contains("scratch"));
        assert_eq!(registry.resolve("scratch"), None);
    }

    #[test]
    fn test_host_less_volume_never_shadows_host_path() {
        let anonymous = Volume {
            host: None,
            container: "/data".to_string(),
            read_only: false,
        };

        let mut registry = VolumeRegistry::new();
        assert_eq!(registry.register(&Volume::bind("/data", "/x")), "data");
        assert_eq!(registry.register(&anonymous), "data-2");
        assert_eq!(registry.resolve("data"), Some("/data"));

        let mut reversed = VolumeRegistry::new();
        assert_eq!(reversed.register(&anonymous), "data");
        assert_eq!(reversed.register(&Volume::bind("/data", "/x")), "data-2");
        assert_eq!(reversed.resolve("data-2"), Some("/data"));
    }

    #[test]
    fn test_distinct_host_paths_with_same_name() {
        let mut registry = VolumeRegistry::new();
        assert_eq!(registry.register(&Volume::bind("/a/b", "/one")), "a-b");
        assert_eq!(registry.register(&Volume::bind("/a-b", "/two")), "a-b-2");
        assert_eq!(registry.register(&Volume::bind("/a/b", "/three")), "a-b");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("a-b-2"), Some("/a-b"));
    }

    #[test]
    fn test_unknown_name_resolves_to_none() {
        let mut registry = VolumeRegistry::new();
        registry.insert("logs", Some("/var/log".to_string()));
        assert_eq!(registry.resolve("logs"), Some("/var/log"));
        assert_eq!(registry.resolve("missing"), None);
    }
}
