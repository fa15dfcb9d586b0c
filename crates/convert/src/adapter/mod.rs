//! Format adapters
//!
//! An adapter converts between one external workload format and the IR.
//! Inbound adapters implement [`Ingester`], outbound adapters implement
//! [`Emitter`]. A format may provide either side or both:
//!
//! | Format | Ingest | Emit |
//! |--------|--------|------|
//! | `compose` | yes | yes |
//! | `ecs` | yes | yes |
//! | `k8s` | yes | no |
//! | `script` | no | yes |
//!
//! The [`FormatRegistry`] maps format names to adapters for lookup by name.

mod registry;

pub use registry::{FormatInfo, FormatRegistry, FormatRegistryBuilder};

use std::io::Read;

use crate::error::Result;
use crate::ir::{PodGroup, validate_group};
use crate::ordering::sort_containers;

/// Trait for inbound adapters.
///
/// # Example
///
/// ```ignore
/// use podshift_convert::{Ingester, PodGroup, Result};
///
/// struct MyIngester;
///
/// impl Ingester for MyIngester {
///     fn ingest_str(&self, document: &str) -> Result<PodGroup> {
///         Ok(PodGroup::new())
///     }
///
///     fn format_name(&self) -> &'static str {
///         "my-format"
///     }
/// }
/// ```
pub trait Ingester: Send + Sync {
    /// Parse a complete native document into a group.
    ///
    /// Containers come back sorted by name with unique names.
    ///
    /// # Errors
    /// Returns [`Error::Structural`](crate::Error::Structural) when the
    /// document does not parse and [`Error::FieldDecode`](crate::Error::FieldDecode)
    /// when one container field is malformed.
    fn ingest_str(&self, document: &str) -> Result<PodGroup>;

    /// Drain `reader` and ingest its contents.
    ///
    /// The reader is consumed and dropped before parsing starts.
    ///
    /// # Errors
    /// Returns [`Error::Io`](crate::Error::Io) if reading fails, otherwise as
    /// [`Ingester::ingest_str`].
    fn ingest(&self, reader: Box<dyn Read + '_>) -> Result<PodGroup> {
        let document = read_document(reader)?;
        self.ingest_str(&document)
    }

    /// Format name used for lookup (e.g. `compose`).
    fn format_name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        "Workload ingester"
    }
}

/// Trait for outbound adapters.
pub trait Emitter: Send + Sync {
    /// Render a group in this format.
    ///
    /// Implementations canonicalize the group first, so output does not
    /// depend on the order containers were ingested in.
    ///
    /// # Errors
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if the
    /// native document cannot be written.
    fn emit(&self, group: &PodGroup) -> Result<String>;

    /// Format name used for lookup (e.g. `ecs`).
    fn format_name(&self) -> &'static str;

    /// File extension for output files (e.g. `json`).
    fn file_extension(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        "Workload emitter"
    }
}

/// Read an entire input stream into a string.
///
/// Takes the stream by value so it is released as soon as reading finishes,
/// whether or not reading succeeded.
///
/// # Errors
/// Returns [`Error::Io`](crate::Error::Io) on read failure or invalid UTF-8.
pub fn read_document(mut input: impl Read) -> Result<String> {
    let mut document = String::new();
    input.read_to_string(&mut document)?;
    Ok(document)
}

/// Final step of every ingest: sort containers by name, then reject
/// duplicate names.
///
/// # Errors
/// Returns [`Error::DuplicateContainer`](crate::Error::DuplicateContainer).
pub fn finish_ingest(format: &'static str, mut group: PodGroup) -> Result<PodGroup> {
    sort_containers(&mut group.containers);
    validate_group(format, &group)?;
    tracing::debug!(
        format,
        containers = group.containers.len(),
        "Ingested workload document"
    );
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Container;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct LineIngester;

    impl Ingester for LineIngester {
        fn ingest_str(&self, document: &str) -> Result<PodGroup> {
            Ok(document
                .lines()
                .fold(PodGroup::new(), |group, name| group.with_container(Container::new(name))))
        }

        fn format_name(&self) -> &'static str {
            "lines"
        }
    }

    struct TrackedReader {
        inner: Cursor<Vec<u8>>,
        fail: bool,
        dropped: Arc<AtomicBool>,
    }

    impl Read for TrackedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.fail {
                return Err(std::io::Error::other("boom"));
            }
            self.inner.read(buf)
        }
    }

    impl Drop for TrackedReader {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    fn tracked(text: &str, fail: bool) -> (TrackedReader, Arc<AtomicBool>) {
        let dropped = Arc::new(AtomicBool::new(false));
        let reader = TrackedReader {
            inner: Cursor::new(text.as_bytes().to_vec()),
            fail,
            dropped: Arc::clone(&dropped),
        };
        (reader, dropped)
    }

    #[test]
    fn test_ingest_reads_whole_stream() {
        let group = LineIngester
            .ingest(Box::new(Cursor::new("web\ndb\n")))
            .unwrap();
        assert_eq!(group.containers.len(), 2);
    }

    #[test]
    fn test_reader_released_on_success() {
        let (reader, dropped) = tracked("web\n", false);
        LineIngester.ingest(Box::new(reader)).unwrap();
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_reader_released_on_failure() {
        let (reader, dropped) = tracked("web\n", true);
        let err = LineIngester.ingest(Box::new(reader)).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_finish_ingest_sorts_and_validates() {
        let group = PodGroup::new()
            .with_container(Container::new("web"))
            .with_container(Container::new("db"));
        let group = finish_ingest("test", group).unwrap();
        assert_eq!(group.containers[0].name, "db");

        let dup = PodGroup::new()
            .with_container(Container::new("web"))
            .with_container(Container::new("web"));
        assert!(matches!(
            finish_ingest("test", dup),
            Err(crate::Error::DuplicateContainer { .. })
        ));
    }

    #[test]
    fn test_default_descriptions() {
        assert_eq!(LineIngester.description(), "Workload ingester");
    }
}
