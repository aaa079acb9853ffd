//! Conversion between the raw CIB tree and the typed `Cib`
//!
//! Only `<configuration><constraints>` becomes typed; `<resources>` is read
//! into a `ResourceIndex` and every other id is recorded as foreign. Writing
//! back replaces the constraints element and nothing else.

use cibctl_core::document::{Document, Element, NodeId};
use cibctl_core::model::{
    ColocationConstraint, DateExpression, DateParts, Expression, LocationConstraint,
    OrderConstraint, RawElement, RawNode, ResourceIndex, ResourceKind, ResourceRef, ResourceSet,
    Rule, RuleChild, TicketConstraint,
};
use cibctl_core::Cib;

use crate::errors::{missing_section, Result};

const CONFIGURATION: &str = "configuration";
const CONSTRAINTS: &str = "constraints";
const RESOURCES: &str = "resources";
const STATUS: &str = "status";

fn fill(raw: &RawElement, mut set: impl FnMut(&str, &str)) {
    for (name, value) in raw.attributes.iter() {
        set(name, value);
    }
}

fn raw_from_pairs(tag: &str, pairs: Vec<(String, String)>) -> RawElement {
    let mut raw = RawElement::new(tag);
    for (name, value) in pairs {
        raw.attributes.set(&name, value);
    }
    raw
}

/// Build the in-memory `Cib` from a parsed document
///
/// # Errors
///
/// `Serialization` when `configuration`, `resources` or `constraints` is
/// missing.
pub fn cib_from_raw(root: &RawElement) -> Result<Cib> {
    let configuration = root
        .child(CONFIGURATION)
        .ok_or_else(|| missing_section(CONFIGURATION))?;
    let resources = configuration
        .child(RESOURCES)
        .ok_or_else(|| missing_section(RESOURCES))?;
    let constraints = configuration
        .child(CONSTRAINTS)
        .ok_or_else(|| missing_section(CONSTRAINTS))?;

    let mut index = ResourceIndex::new();
    index_resources(resources, None, &mut index);

    let mut cib = Cib::new(index, document_from_raw(constraints));

    let mut foreign = Vec::new();
    for section in root.child_elements() {
        match section.tag.as_str() {
            STATUS => {}
            CONFIGURATION => {
                if let Some(id) = section.id() {
                    foreign.push(id.to_string());
                }
                for child in section.child_elements().filter(|el| el.tag != CONSTRAINTS) {
                    child.collect_ids(&mut foreign);
                }
            }
            _ => section.collect_ids(&mut foreign),
        }
    }
    for id in foreign {
        cib.add_foreign_id(id);
    }

    tracing::debug!(
        resource_count = cib.resources.len(),
        constraint_count = cib.constraints.constraints().len(),
        "cib loaded"
    );
    Ok(cib)
}

fn index_resources(element: &RawElement, parent: Option<&str>, index: &mut ResourceIndex) {
    for child in element.child_elements() {
        if let (Some(kind), Some(id)) = (ResourceKind::from_tag(&child.tag), child.id()) {
            index.insert(id, kind, parent);
            index_resources(child, Some(id), index);
        }
    }
}

/// Typed constraint tree from a `<constraints>` element
pub fn document_from_raw(constraints: &RawElement) -> Document {
    let mut doc = Document::new();
    for child in constraints.child_elements() {
        let id = doc.append_constraint(constraint_element(child));
        add_constraint_children(&mut doc, id, child);
    }
    doc
}

fn constraint_element(raw: &RawElement) -> Element {
    match raw.tag.as_str() {
        "rsc_location" => {
            let mut c = LocationConstraint::default();
            fill(raw, |n, v| c.set_attribute(n, v));
            Element::Location(c)
        }
        "rsc_order" => {
            let mut c = OrderConstraint::default();
            fill(raw, |n, v| c.set_attribute(n, v));
            Element::Order(c)
        }
        "rsc_colocation" => {
            let mut c = ColocationConstraint::default();
            fill(raw, |n, v| c.set_attribute(n, v));
            Element::Colocation(c)
        }
        "rsc_ticket" => {
            let mut c = TicketConstraint::default();
            fill(raw, |n, v| c.set_attribute(n, v));
            Element::Ticket(c)
        }
        _ => Element::Other(raw.clone()),
    }
}

fn add_constraint_children(doc: &mut Document, parent: NodeId, raw: &RawElement) {
    if matches!(doc.element(parent), Some(Element::Other(_)) | None) {
        return;
    }
    for child in raw.child_elements() {
        match child.tag.as_str() {
            "resource_set" => {
                let mut set = ResourceSet::default();
                fill(child, |n, v| set.set_attribute(n, v));
                let Some(set_id) = doc.append_child(parent, Element::ResourceSet(set)) else {
                    continue;
                };
                for member in child.child_elements() {
                    let element = match (member.tag.as_str(), member.id()) {
                        ("resource_ref", Some(id)) => Element::ResourceRef(ResourceRef::new(id)),
                        _ => Element::Other(member.clone()),
                    };
                    doc.append_child(set_id, element);
                }
            }
            "rule" => {
                doc.append_child(parent, Element::Rule(rule_from_raw(child)));
            }
            _ => {
                doc.append_child(parent, Element::Other(child.clone()));
            }
        }
    }
}

fn date_parts(raw: &RawElement) -> DateParts {
    let mut parts = DateParts {
        id: raw.id().unwrap_or_default().to_string(),
        ..Default::default()
    };
    for (name, value) in raw.attributes.iter().filter(|(n, _)| *n != "id") {
        parts.fields.set(name, value);
    }
    parts
}

/// Typed rule tree from a `<rule>` element
pub fn rule_from_raw(raw: &RawElement) -> Rule {
    let mut rule = Rule::default();
    fill(raw, |n, v| rule.set_attribute(n, v));
    for child in raw.child_elements() {
        let typed = match child.tag.as_str() {
            "expression" => {
                let mut expr = Expression::default();
                fill(child, |n, v| expr.set_attribute(n, v));
                RuleChild::Expression(expr)
            }
            "date_expression" => {
                let mut date = DateExpression::default();
                fill(child, |n, v| date.set_attribute(n, v));
                for part in child.child_elements() {
                    match part.tag.as_str() {
                        "date_spec" if date.date_spec.is_none() => {
                            date.date_spec = Some(date_parts(part))
                        }
                        "duration" if date.duration.is_none() => {
                            date.duration = Some(date_parts(part))
                        }
                        _ => date.other.push(part.clone()),
                    }
                }
                RuleChild::Date(date)
            }
            "rule" => RuleChild::Rule(rule_from_raw(child)),
            _ => RuleChild::Other(child.clone()),
        };
        rule.children.push(typed);
    }
    rule
}

fn parts_to_raw(tag: &str, parts: &DateParts) -> RawElement {
    let mut raw = RawElement::new(tag);
    raw.attributes.set("id", parts.id.clone());
    for (name, value) in parts.fields.iter() {
        raw.attributes.set(name, value);
    }
    raw
}

/// `<rule>` element for a typed rule tree
pub fn rule_to_raw(rule: &Rule) -> RawElement {
    let mut raw = raw_from_pairs("rule", rule.attributes());
    for child in &rule.children {
        let element = match child {
            RuleChild::Expression(expr) => raw_from_pairs("expression", expr.attributes()),
            RuleChild::Date(date) => {
                let mut el = raw_from_pairs("date_expression", date.attributes());
                if let Some(spec) = &date.date_spec {
                    el.children
                        .push(RawNode::Element(parts_to_raw("date_spec", spec)));
                }
                if let Some(duration) = &date.duration {
                    el.children
                        .push(RawNode::Element(parts_to_raw("duration", duration)));
                }
                el.children
                    .extend(date.other.iter().cloned().map(RawNode::Element));
                el
            }
            RuleChild::Rule(nested) => rule_to_raw(nested),
            RuleChild::Other(other) => other.clone(),
        };
        raw.children.push(RawNode::Element(element));
    }
    raw
}

fn node_to_raw(doc: &Document, id: NodeId) -> Option<RawElement> {
    let mut raw = match doc.element(id)? {
        Element::Constraints => RawElement::new(CONSTRAINTS),
        Element::Location(c) => raw_from_pairs("rsc_location", c.attributes()),
        Element::Order(c) => raw_from_pairs("rsc_order", c.attributes()),
        Element::Colocation(c) => raw_from_pairs("rsc_colocation", c.attributes()),
        Element::Ticket(c) => raw_from_pairs("rsc_ticket", c.attributes()),
        Element::ResourceSet(s) => raw_from_pairs("resource_set", s.attributes()),
        Element::ResourceRef(r) => {
            raw_from_pairs("resource_ref", vec![("id".to_string(), r.id.clone())])
        }
        Element::Rule(rule) => return Some(rule_to_raw(rule)),
        Element::Other(other) => return Some(other.clone()),
    };
    raw.children.extend(
        doc.children(id)
            .iter()
            .filter_map(|child| node_to_raw(doc, *child))
            .map(RawNode::Element),
    );
    Some(raw)
}

/// `<constraints>` element for the whole document
pub fn document_to_raw(doc: &Document) -> RawElement {
    node_to_raw(doc, doc.root()).unwrap_or_else(|| RawElement::new(CONSTRAINTS))
}

/// Swap the constraints section of `root` for the one held by `cib`
///
/// # Errors
///
/// `Serialization` when `root` has no `configuration/constraints` section.
pub fn replace_constraints(root: &mut RawElement, cib: &Cib) -> Result<()> {
    let configuration = root
        .child_elements_mut()
        .find(|el| el.tag == CONFIGURATION)
        .ok_or_else(|| missing_section(CONFIGURATION))?;
    let slot = configuration
        .child_elements_mut()
        .find(|el| el.tag == CONSTRAINTS)
        .ok_or_else(|| missing_section(CONSTRAINTS))?;
    *slot = document_to_raw(&cib.constraints);
    Ok(())
}
