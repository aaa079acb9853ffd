//! Keeping constraints consistent with resource and node changes
//!
//! These run when a resource is deleted, moved into a clone or master, or a
//! node leaves the cluster, and back `constraint ref`.

use std::collections::BTreeSet;

use crate::cib::Cib;
use crate::document::{Element, NodeId, Tag};
use crate::errors::Result;
use crate::model::ResourceKind;

use super::order::resource_refs_to;

/// Attributes that name a resource directly on a simple constraint
const RESOURCE_ATTRIBUTES: &[&str] = &["rsc", "first", "then", "with-rsc"];

/// Constraint ids referring to a resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintMatches {
    /// Simple constraints naming the resource, colocation first, then
    /// location, order and ticket
    pub direct: Vec<String>,
    /// Constraints with a set containing the resource, sorted
    pub sets: Vec<String>,
}

impl ConstraintMatches {
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.sets.is_empty()
    }
}

/// Find every constraint referring to `rsc`
///
/// A primitive directly inside a clone or master also matches the parent's
/// constraints, which are listed first.
pub fn find_constraints_containing(cib: &Cib, rsc: &str) -> ConstraintMatches {
    let mut direct = Vec::new();
    let mut sets = BTreeSet::new();

    let is_primitive = cib
        .resources
        .get(rsc)
        .is_some_and(|entry| entry.kind == ResourceKind::Primitive);
    if is_primitive {
        if let Some((parent, _)) = cib.resources.clone_like_parent(rsc) {
            let inherited = find_constraints_containing(cib, parent);
            direct.extend(inherited.direct);
            sets.extend(inherited.sets);
        }
    }

    let doc = &cib.constraints;
    for tag in [Tag::Colocation, Tag::Location, Tag::Order, Tag::Ticket] {
        for node in doc.elements_by_tag(tag) {
            let Some(element) = doc.element(node) else {
                continue;
            };
            let names_rsc = RESOURCE_ATTRIBUTES
                .iter()
                .any(|attr| element.attribute(attr) == Some(rsc));
            if names_rsc {
                if let Some(id) = element.id() {
                    direct.push(id.to_string());
                }
            }
        }
    }

    for reference in resource_refs_to(cib, rsc) {
        let owner = doc
            .owning_constraint(reference)
            .and_then(|c| doc.element(c))
            .and_then(Element::id);
        if let Some(id) = owner {
            sets.insert(id.to_string());
        }
    }

    ConstraintMatches {
        direct,
        sets: sets.into_iter().collect(),
    }
}

fn top_level_by_id(cib: &Cib, id: &str) -> Option<NodeId> {
    cib.constraints
        .constraints()
        .into_iter()
        .find(|node| cib.constraints.element(*node).and_then(Element::id) == Some(id))
}

/// Remove every constraint naming `rsc` and strip it from resource sets
///
/// Emptied sets and set-less constraints are pruned. Returns one progress
/// line per step.
pub fn remove_constraints_containing(cib: &mut Cib, rsc: &str) -> Result<Vec<String>> {
    let matches = find_constraints_containing(cib, rsc);
    let mut lines = Vec::new();

    for id in &matches.direct {
        if let Some(node) = top_level_by_id(cib, id) {
            lines.push(format!("Removing Constraint - {}", id));
            cib.constraints.remove(node);
        }
    }

    for reference in resource_refs_to(cib, rsc) {
        if !cib.constraints.contains(reference) {
            continue;
        }
        let removal = cib.constraints.remove_resource_ref(reference);
        let set_id = removal.set_id.unwrap_or_default();
        lines.push(format!("Removing {} from set {}", rsc, set_id));
        if removal.set_removed {
            lines.push(format!("Removing set {}", set_id));
        }
        if let Some(constraint_id) = removal.constraint_id {
            lines.push(format!("Removing constraint {}", constraint_id));
        }
    }
    Ok(lines)
}

/// Point simple location, order and colocation constraints at the clone or
/// master that now encloses `old`
///
/// Resource sets keep referring to `old`. Returns the number of rewritten
/// attributes.
pub fn constraint_resource_update(cib: &mut Cib, old: &str) -> usize {
    let Some(new) = cib.resources.clone_like_ancestor(old).map(str::to_string) else {
        return 0;
    };

    let mut rewritten = 0;
    for tag in [Tag::Location, Tag::Order, Tag::Colocation] {
        for node in cib.constraints.elements_by_tag(tag) {
            let Some(element) = cib.constraints.element_mut(node) else {
                continue;
            };
            for attr in RESOURCE_ATTRIBUTES {
                if element.attribute(attr) != Some(old) {
                    continue;
                }
                let updated = match &mut *element {
                    Element::Location(c) => {
                        c.set_attribute(attr, new.as_str());
                        true
                    }
                    Element::Order(c) => {
                        c.set_attribute(attr, new.as_str());
                        true
                    }
                    Element::Colocation(c) => {
                        c.set_attribute(attr, new.as_str());
                        true
                    }
                    _ => false,
                };
                if updated {
                    rewritten += 1;
                }
            }
        }
    }
    tracing::debug!(old = %old, new = %new, rewritten, "constraint references moved to parent");
    rewritten
}

/// Remove every location constraint pinned to `node`
pub fn remove_constraints_containing_node(cib: &mut Cib, node: &str) -> Vec<String> {
    let matching: Vec<(NodeId, String)> = cib
        .constraints
        .elements_by_tag(Tag::Location)
        .into_iter()
        .filter_map(|n| match cib.constraints.element(n) {
            Some(Element::Location(l)) if l.node.as_deref() == Some(node) => Some((n, l.id.clone())),
            _ => None,
        })
        .collect();

    matching
        .into_iter()
        .map(|(n, id)| {
            cib.constraints.remove(n);
            format!("Removing Constraint - {}", id)
        })
        .collect()
}

/// `constraint ref <rsc>...`
pub fn constraint_ref(cib: &Cib, resources: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for rsc in resources {
        lines.push(format!("Resource: {}", rsc));
        let matches = find_constraints_containing(cib, rsc);
        if matches.is_empty() {
            lines.push("  No Matches.".to_string());
            continue;
        }
        lines.extend(
            matches
                .direct
                .iter()
                .chain(matches.sets.iter())
                .map(|id| format!("  {}", id)),
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::model::{
        ColocationConstraint, LocationConstraint, OrderConstraint, ResourceIndex, ResourceRef,
        ResourceSet,
    };

    fn cib() -> Cib {
        let mut resources = ResourceIndex::new();
        resources.insert("A", ResourceKind::Primitive, None);
        resources.insert("B", ResourceKind::Primitive, None);
        resources.insert("web-clone", ResourceKind::Clone, None);
        resources.insert("web", ResourceKind::Primitive, Some("web-clone"));
        let mut cib = Cib::new(resources, Document::new());
        let doc = &mut cib.constraints;
        doc.append_constraint(Element::Order(OrderConstraint {
            id: "o1".to_string(),
            first: Some("A".to_string()),
            then: Some("web".to_string()),
            ..Default::default()
        }));
        doc.append_constraint(Element::Location(LocationConstraint {
            id: "l1".to_string(),
            rsc: Some("web-clone".to_string()),
            node: Some("N1".to_string()),
            score: Some("100".to_string()),
            ..Default::default()
        }));
        doc.append_constraint(Element::Colocation(ColocationConstraint {
            id: "c1".to_string(),
            rsc: Some("web".to_string()),
            with_rsc: Some("B".to_string()),
            score: Some("INFINITY".to_string()),
            ..Default::default()
        }));
        let set_constraint = doc.append_constraint(Element::Order(OrderConstraint {
            id: "os".to_string(),
            ..Default::default()
        }));
        let set = doc
            .append_child(
                set_constraint,
                Element::ResourceSet(ResourceSet {
                    id: "os_set".to_string(),
                    ..Default::default()
                }),
            )
            .unwrap();
        doc.append_child(set, Element::ResourceRef(ResourceRef::new("web")));
        cib
    }

    #[test]
    fn test_clone_parent_results_come_first() {
        let matches = find_constraints_containing(&cib(), "web");
        assert_eq!(matches.direct, vec!["l1", "c1", "o1"]);
        assert_eq!(matches.sets, vec!["os"]);
    }

    #[test]
    fn test_remove_reports_each_step() {
        let mut cib = cib();
        let lines = remove_constraints_containing(&mut cib, "web").unwrap();
        assert_eq!(
            lines,
            vec![
                "Removing Constraint - l1",
                "Removing Constraint - c1",
                "Removing Constraint - o1",
                "Removing web from set os_set",
                "Removing set os_set",
                "Removing constraint os",
            ]
        );
        assert!(cib.constraints.is_empty());
    }

    #[test]
    fn test_update_moves_direct_references_only() {
        let mut cib = cib();
        assert_eq!(constraint_resource_update(&mut cib, "web"), 2);
        assert_eq!(
            find_constraints_containing(&cib, "web-clone").direct,
            vec!["c1", "l1", "o1"]
        );
        assert_eq!(find_constraints_containing(&cib, "web").sets, vec!["os"]);
        assert_eq!(constraint_resource_update(&mut cib, "A"), 0);
    }

    #[test]
    fn test_node_removal_and_ref_listing() {
        let mut cib = cib();
        assert_eq!(
            remove_constraints_containing_node(&mut cib, "N1"),
            vec!["Removing Constraint - l1"]
        );
        assert_eq!(
            constraint_ref(&cib, &["B".to_string(), "nope".to_string()]),
            vec!["Resource: B", "  c1", "Resource: nope", "  No Matches."]
        );
    }
}
