//! Group-level invariants.

use super::schema::PodGroup;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Check that every container name in `group` is unique.
///
/// `format` names the adapter doing the check so the error points at the
/// document that carried the collision.
///
/// # Errors
/// Returns [`Error::DuplicateContainer`] for the first repeated name.
pub fn validate_group(format: &'static str, group: &PodGroup) -> Result<()> {
    let mut seen = HashSet::with_capacity(group.containers.len());
    for container in &group.containers {
        if !seen.insert(container.name.as_str()) {
            return Err(Error::DuplicateContainer {
                format,
                name: container.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Container;

    #[test]
    fn test_unique_names_pass() {
        let group = PodGroup::new()
            .with_container(Container::new("web"))
            .with_container(Container::new("db"));
        assert!(validate_group("test", &group).is_ok());
    }

    #[test]
    fn test_duplicate_names_fail() {
        let group = PodGroup::new()
            .with_container(Container::new("web"))
            .with_container(Container::new("db"))
            .with_container(Container::new("web"));

        let err = validate_group("ecs", &group).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateContainer { format: "ecs", ref name } if name == "web"
        ));
    }

    #[test]
    fn test_empty_group_is_valid() {
        assert!(validate_group("test", &PodGroup::new()).is_ok());
    }
}
