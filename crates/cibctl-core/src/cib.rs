//! The cluster configuration as seen by constraint commands

use std::collections::BTreeSet;

use crate::document::Document;
use crate::errors::{CibError, Result};
use crate::ids;
use crate::model::{ResourceIndex, ResourceKind};

/// Constraint tree plus the parts of the CIB constraints refer to
#[derive(Debug, Clone, Default)]
pub struct Cib {
    pub resources: ResourceIndex,
    pub constraints: Document,
    foreign_ids: BTreeSet<String>,
}

/// Outcome of checking a resource id for use in a constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCheck {
    pub valid: bool,
    pub error: Option<String>,
    /// Id to use instead when autocorrecting
    pub corrected: Option<String>,
}

impl Cib {
    pub fn new(resources: ResourceIndex, constraints: Document) -> Self {
        Self {
            resources,
            constraints,
            foreign_ids: BTreeSet::new(),
        }
    }

    /// Record an id used outside the constraint section
    pub fn add_foreign_id(&mut self, id: impl Into<String>) {
        self.foreign_ids.insert(id.into());
    }

    pub fn foreign_ids(&self) -> impl Iterator<Item = &str> {
        self.foreign_ids.iter().map(String::as_str)
    }

    /// Whether `id` is taken anywhere in the configuration
    pub fn id_exists(&self, id: &str) -> bool {
        self.foreign_ids.contains(id)
            || self.resources.contains(id)
            || self.constraints.contains_id(id)
    }

    /// `base` if free, else the first free `base-N`
    pub fn allocate_unique_id(&self, base: &str) -> String {
        ids::find_unique_id(base, |candidate| self.id_exists(candidate))
    }

    /// Validate a caller-supplied id and make sure nothing uses it yet
    ///
    /// # Errors
    ///
    /// `InvalidId` for malformed ids, `IdInUse` when already taken.
    pub fn check_new_id(&self, id: &str, description: &str) -> Result<()> {
        ids::validate_xml_id(id, description)?;
        if self.id_exists(id) {
            return Err(CibError::IdInUse { id: id.to_string() });
        }
        Ok(())
    }

    /// Decide whether `candidate` may be referenced by a constraint
    ///
    /// Clones, masters and bundles are always fine. A primitive or group
    /// directly inside a clone or master is refused (accepted under `force`)
    /// and its parent is offered as the correction.
    pub fn resolve_resource_id(&self, candidate: &str, force: bool) -> ResourceCheck {
        let Some(entry) = self.resources.get(candidate) else {
            return ResourceCheck {
                valid: false,
                error: Some(format!("Resource '{}' does not exist", candidate)),
                corrected: None,
            };
        };

        if matches!(
            entry.kind,
            ResourceKind::Clone | ResourceKind::Master | ResourceKind::Bundle
        ) {
            return ResourceCheck {
                valid: true,
                error: None,
                corrected: Some(candidate.to_string()),
            };
        }

        match self.resources.clone_like_parent(candidate) {
            Some((parent, kind)) => {
                let message = if kind == ResourceKind::Master {
                    format!(
                        "{} is a master/slave resource, you should use the master id: {} when adding constraints. Use --force to override.",
                        candidate, parent
                    )
                } else {
                    format!(
                        "{} is a clone resource, you should use the clone id: {} when adding constraints. Use --force to override.",
                        candidate, parent
                    )
                };
                ResourceCheck {
                    valid: force,
                    error: Some(message),
                    corrected: Some(parent.to_string()),
                }
            }
            None => ResourceCheck {
                valid: true,
                error: None,
                corrected: None,
            },
        }
    }

    /// Resource id to store in a constraint
    ///
    /// Uses the correction when `autocorrect` is set and one exists,
    /// otherwise fails on invalid references.
    ///
    /// # Errors
    ///
    /// `InvalidResource` with the resolution message.
    pub fn constraint_resource(
        &self,
        candidate: &str,
        force: bool,
        autocorrect: bool,
    ) -> Result<String> {
        let check = self.resolve_resource_id(candidate, force);
        if autocorrect {
            if let Some(corrected) = check.corrected {
                return Ok(corrected);
            }
        }
        if !check.valid {
            return Err(CibError::InvalidResource {
                resource_id: candidate.to_string(),
                message: check.error.unwrap_or_default(),
            });
        }
        Ok(candidate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cib() -> Cib {
        let mut resources = ResourceIndex::new();
        resources.insert("A", ResourceKind::Primitive, None);
        resources.insert("web-clone", ResourceKind::Clone, None);
        resources.insert("web", ResourceKind::Primitive, Some("web-clone"));
        resources.insert("db-master", ResourceKind::Master, None);
        resources.insert("db", ResourceKind::Primitive, Some("db-master"));
        let mut cib = Cib::new(resources, Document::new());
        cib.add_foreign_id("cib-bootstrap-options");
        cib
    }

    #[test]
    fn test_unknown_resource_is_invalid() {
        let check = cib().resolve_resource_id("nope", false);
        assert!(!check.valid);
        assert_eq!(check.error.as_deref(), Some("Resource 'nope' does not exist"));
        assert_eq!(check.corrected, None);
    }

    #[test]
    fn test_clone_child_offers_parent() {
        let check = cib().resolve_resource_id("web", false);
        assert!(!check.valid);
        assert_eq!(check.corrected.as_deref(), Some("web-clone"));
        assert!(check
            .error
            .as_deref()
            .is_some_and(|e| e.contains("you should use the clone id: web-clone")));

        assert!(cib().resolve_resource_id("web", true).valid);
    }

    #[test]
    fn test_master_child_message() {
        let check = cib().resolve_resource_id("db", false);
        assert!(check
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("db is a master/slave resource")));
    }

    #[test]
    fn test_autocorrect_uses_parent() {
        let cib = cib();
        assert_eq!(cib.constraint_resource("web", false, true).unwrap(), "web-clone");
        assert!(matches!(
            cib.constraint_resource("web", false, false),
            Err(CibError::InvalidResource { .. })
        ));
        assert_eq!(cib.constraint_resource("A", false, false).unwrap(), "A");
    }

    #[test]
    fn test_id_exists_covers_foreign_and_resources() {
        let cib = cib();
        assert!(cib.id_exists("cib-bootstrap-options"));
        assert!(cib.id_exists("A"));
        assert!(!cib.id_exists("free"));
        assert_eq!(cib.allocate_unique_id("A"), "A-1");
    }
}
