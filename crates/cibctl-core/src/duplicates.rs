//! Duplicate detection for simple constraints and rule-based locations
//!
//! Each kind compares a normalized key. Set-based constraints never take
//! part: they are not compared with simple ones nor with each other.

use crate::document::{Document, Element, NodeId, Tag};
use crate::model::constraint::{DEFAULT_ACTION, DEFAULT_ROLE};
use crate::model::{capitalize, ColocationConstraint, OrderConstraint, TicketConstraint};
use crate::rules::render_expression;

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn order_key(order: &OrderConstraint) -> (String, String, String, String) {
    (
        order.first.clone().unwrap_or_default(),
        order.then.clone().unwrap_or_default(),
        or_default(
            order.first_action.as_deref().unwrap_or_default().to_lowercase(),
            DEFAULT_ACTION,
        ),
        or_default(
            order.then_action.as_deref().unwrap_or_default().to_lowercase(),
            DEFAULT_ACTION,
        ),
    )
}

fn colocation_key(colocation: &ColocationConstraint) -> (String, String, String, String) {
    (
        colocation.rsc.clone().unwrap_or_default(),
        colocation.with_rsc.clone().unwrap_or_default(),
        or_default(
            capitalize(colocation.rsc_role.as_deref().unwrap_or_default()),
            DEFAULT_ROLE,
        ),
        or_default(
            capitalize(colocation.with_rsc_role.as_deref().unwrap_or_default()),
            DEFAULT_ROLE,
        ),
    )
}

fn ticket_key(ticket: &TicketConstraint) -> (String, String, String) {
    (
        ticket.ticket.clone().unwrap_or_default(),
        ticket.rsc.clone().unwrap_or_default(),
        or_default(
            capitalize(ticket.rsc_role.as_deref().unwrap_or_default()),
            DEFAULT_ROLE,
        ),
    )
}

/// Simple (set-less) constraints of `tag` other than `candidate`
fn simple_peers(doc: &Document, tag: Tag, candidate: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    doc.elements_by_tag(tag).into_iter().filter(move |node| {
        *node != candidate && !doc.has_descendant(*node, Tag::ResourceSet)
    })
}

/// Order constraints with the same (first, then, first-action, then-action)
pub fn find_order_duplicates(doc: &Document, candidate: NodeId) -> Vec<NodeId> {
    let Some(Element::Order(order)) = doc.element(candidate) else {
        return Vec::new();
    };
    if doc.has_descendant(candidate, Tag::ResourceSet) {
        return Vec::new();
    }
    let key = order_key(order);
    simple_peers(doc, Tag::Order, candidate)
        .filter(|node| matches!(doc.element(*node), Some(Element::Order(o)) if order_key(o) == key))
        .collect()
}

/// Colocation constraints with the same (rsc, with-rsc, rsc-role, with-rsc-role)
pub fn find_colocation_duplicates(doc: &Document, candidate: NodeId) -> Vec<NodeId> {
    let Some(Element::Colocation(colocation)) = doc.element(candidate) else {
        return Vec::new();
    };
    if doc.has_descendant(candidate, Tag::ResourceSet) {
        return Vec::new();
    }
    let key = colocation_key(colocation);
    simple_peers(doc, Tag::Colocation, candidate)
        .filter(|node| {
            matches!(doc.element(*node), Some(Element::Colocation(c)) if colocation_key(c) == key)
        })
        .collect()
}

/// Ticket constraints with the same (ticket, rsc, rsc-role)
pub fn find_ticket_duplicates(doc: &Document, candidate: NodeId) -> Vec<NodeId> {
    let Some(Element::Ticket(ticket)) = doc.element(candidate) else {
        return Vec::new();
    };
    if doc.has_descendant(candidate, Tag::ResourceSet) {
        return Vec::new();
    }
    let key = ticket_key(ticket);
    simple_peers(doc, Tag::Ticket, candidate)
        .filter(|node| matches!(doc.element(*node), Some(Element::Ticket(t)) if ticket_key(t) == key))
        .collect()
}

fn location_rule_key(doc: &Document, node: NodeId) -> Option<(String, Vec<String>)> {
    let Some(Element::Location(location)) = doc.element(node) else {
        return None;
    };
    let rules = doc
        .children_by_tag(node, Tag::Rule)
        .into_iter()
        .filter_map(|rule| match doc.element(rule) {
            Some(Element::Rule(rule)) => Some(rule),
            _ => None,
        })
        .flat_map(|rule| std::iter::once(rule).chain(rule.descendant_rules()))
        .map(|rule| render_expression(rule, true))
        .collect();
    Some((location.rsc.clone().unwrap_or_default(), rules))
}

/// Rule-based location constraints on the same resource with the same rules
pub fn find_location_rule_duplicates(doc: &Document, candidate: NodeId) -> Vec<NodeId> {
    let Some(key) = location_rule_key(doc, candidate) else {
        return Vec::new();
    };
    doc.elements_by_tag(Tag::Location)
        .into_iter()
        .filter(|node| {
            *node != candidate
                && !doc.children_by_tag(*node, Tag::Rule).is_empty()
                && location_rule_key(doc, *node).as_ref() == Some(&key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResourceRef, ResourceSet};

    fn order(id: &str, first: &str, then: &str, first_action: Option<&str>) -> Element {
        Element::Order(OrderConstraint {
            id: id.to_string(),
            first: Some(first.to_string()),
            then: Some(then.to_string()),
            first_action: first_action.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn test_order_actions_default_and_ignore_case() {
        let mut doc = Document::new();
        let existing = doc.append_constraint(order("o1", "A", "B", None));
        let candidate = doc.append_constraint(order("o2", "A", "B", Some("START")));
        assert_eq!(find_order_duplicates(&doc, candidate), vec![existing]);

        let other = doc.append_constraint(order("o3", "A", "B", Some("promote")));
        assert!(find_order_duplicates(&doc, other).is_empty());
    }

    #[test]
    fn test_set_constraints_never_compared() {
        let mut doc = Document::new();
        let with_set = doc.append_constraint(order("o1", "A", "B", None));
        let set = doc
            .append_child(
                with_set,
                Element::ResourceSet(ResourceSet {
                    id: "o1-set".to_string(),
                    ..Default::default()
                }),
            )
            .unwrap();
        doc.append_child(set, Element::ResourceRef(ResourceRef::new("A")))
            .unwrap();
        let candidate = doc.append_constraint(order("o2", "A", "B", None));
        assert!(find_order_duplicates(&doc, candidate).is_empty());
    }

    #[test]
    fn test_colocation_roles_default_to_started() {
        let mut doc = Document::new();
        let existing = doc.append_constraint(Element::Colocation(ColocationConstraint {
            id: "c1".to_string(),
            rsc: Some("A".to_string()),
            with_rsc: Some("B".to_string()),
            rsc_role: Some("started".to_string()),
            ..Default::default()
        }));
        let candidate = doc.append_constraint(Element::Colocation(ColocationConstraint {
            id: "c2".to_string(),
            rsc: Some("A".to_string()),
            with_rsc: Some("B".to_string()),
            ..Default::default()
        }));
        assert_eq!(find_colocation_duplicates(&doc, candidate), vec![existing]);
    }
}
