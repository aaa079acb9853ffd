//! One-line console renderings of constraints

use crate::document::{Document, Element, NodeId, Tag};
use crate::model::{ColocationConstraint, OrderConstraint, TicketConstraint};

fn is_true(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "on" | "yes" | "y" | "1"
    )
}

/// `[first-action] first then [then-action] then (kind:..|score:..) ...`
pub fn order_plain(order: &OrderConstraint, with_id: bool) -> String {
    let score_text = match (order.kind.as_deref(), order.score.as_deref()) {
        (Some(kind), _) if !kind.is_empty() => format!("(kind:{})", kind),
        (_, Some(score)) if !score.is_empty() => format!("(score:{})", score),
        _ => "(kind:Mandatory)".to_string(),
    };
    let symmetrical = match order.symmetrical.as_deref() {
        Some(value) if !is_true(value) => "(non-symmetrical)".to_string(),
        _ => String::new(),
    };
    let options = order
        .extra
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(" ");
    let options = if options.is_empty() {
        options
    } else {
        format!("(Options: {})", options)
    };
    let id = if with_id {
        format!("(id:{})", order.id)
    } else {
        String::new()
    };

    [
        order.first_action.clone().unwrap_or_default(),
        order.first.clone().unwrap_or_default(),
        "then".to_string(),
        order.then_action.clone().unwrap_or_default(),
        order.then.clone().unwrap_or_default(),
        score_text,
        symmetrical,
        options,
        id,
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

/// `rsc with with-rsc (score:S) (name:value)... [(id:..)]`
pub fn colocation_plain(colocation: &ColocationConstraint, with_id: bool) -> String {
    let mut options: Vec<(String, String)> = colocation
        .attributes()
        .into_iter()
        .filter(|(name, _)| !matches!(name.as_str(), "rsc" | "with-rsc" | "id" | "score"))
        .collect();
    options.sort();

    let mut parts = vec![
        colocation.rsc.clone().unwrap_or_default(),
        "with".to_string(),
        colocation.with_rsc.clone().unwrap_or_default(),
        format!("(score:{})", colocation.score.as_deref().unwrap_or_default()),
    ];
    parts.extend(
        options
            .into_iter()
            .map(|(name, value)| format!("({}:{})", name, value)),
    );
    if with_id {
        parts.push(format!("(id:{})", colocation.id));
    }
    parts.join(" ")
}

/// `[role ]rsc name=value... [(id:..)]`
pub fn ticket_plain(ticket: &TicketConstraint, with_id: bool) -> String {
    let mut parts = vec![ticket.rsc.clone().unwrap_or_default()];
    parts.extend(option_words(&ticket.attributes(), &["rsc", "rsc-role"], with_id));
    let line = parts.join(" ");
    match ticket.rsc_role.as_deref() {
        Some(role) if !role.is_empty() => format!("{} {}", role, line),
        _ => line,
    }
}

/// Sorted `name=value` words without `id` and `skip`, then `(id:..)`
fn option_words(attributes: &[(String, String)], skip: &[&str], with_id: bool) -> Vec<String> {
    let mut pairs: Vec<&(String, String)> = attributes
        .iter()
        .filter(|(name, _)| name != "id" && !skip.contains(&name.as_str()))
        .collect();
    pairs.sort();
    let mut words: Vec<String> = pairs
        .into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    if with_id {
        if let Some((_, id)) = attributes.iter().find(|(name, _)| name == "id") {
            words.push(format!("(id:{})", id));
        }
    }
    words
}

fn element_attributes(element: &Element) -> Vec<(String, String)> {
    match element {
        Element::Location(c) => c.attributes(),
        Element::Order(c) => c.attributes(),
        Element::Colocation(c) => c.attributes(),
        Element::Ticket(c) => c.attributes(),
        Element::ResourceSet(s) => s.attributes(),
        Element::Rule(r) => r.attributes(),
        Element::Other(raw) => raw
            .attributes
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect(),
        Element::Constraints | Element::ResourceRef(_) => Vec::new(),
    }
}

/// `set A B opt=v [(id:..)] set C ... [setoptions opt=v [(id:..)]]`
pub fn set_constraint_plain(doc: &Document, constraint: NodeId, with_id: bool) -> String {
    let mut parts = Vec::new();
    for set in doc.children_by_tag(constraint, Tag::ResourceSet) {
        let mut words = vec!["set".to_string()];
        words.extend(
            doc.children_by_tag(set, Tag::ResourceRef)
                .into_iter()
                .filter_map(|r| match doc.element(r) {
                    Some(Element::ResourceRef(r)) => Some(r.id.clone()),
                    _ => None,
                }),
        );
        if let Some(element) = doc.element(set) {
            words.extend(option_words(&element_attributes(element), &[], with_id));
        }
        parts.push(words.join(" "));
    }

    if let Some(element) = doc.element(constraint) {
        let options = option_words(&element_attributes(element), &[], with_id);
        if !options.is_empty() {
            parts.push(format!("setoptions {}", options.join(" ")));
        }
    }
    parts.join(" ")
}

/// One-line rendering of any top-level constraint, as used in duplicate reports
pub fn constraint_plain(doc: &Document, constraint: NodeId, with_id: bool) -> String {
    if doc.has_descendant(constraint, Tag::ResourceSet) {
        return set_constraint_plain(doc, constraint, with_id);
    }
    match doc.element(constraint) {
        Some(Element::Order(order)) => order_plain(order, with_id),
        Some(Element::Colocation(colocation)) => colocation_plain(colocation, with_id),
        Some(Element::Ticket(ticket)) => ticket_plain(ticket, with_id),
        Some(element) => option_words(&element_attributes(element), &[], with_id).join(" "),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResourceRef, ResourceSet};

    #[test]
    fn test_order_plain_mandatory_with_id() {
        let order = OrderConstraint {
            id: "order-A-B-mandatory".to_string(),
            first: Some("A".to_string()),
            then: Some("B".to_string()),
            first_action: Some("start".to_string()),
            then_action: Some("start".to_string()),
            ..Default::default()
        };
        assert_eq!(
            order_plain(&order, true),
            "start A then start B (kind:Mandatory) (id:order-A-B-mandatory)"
        );
    }

    #[test]
    fn test_order_plain_score_and_options() {
        let mut order = OrderConstraint {
            id: "o".to_string(),
            first: Some("A".to_string()),
            then: Some("B".to_string()),
            score: Some("10".to_string()),
            symmetrical: Some("false".to_string()),
            ..Default::default()
        };
        order.set_attribute("require-all", "false");
        assert_eq!(
            order_plain(&order, false),
            "A then B (score:10) (non-symmetrical) (Options: require-all=false)"
        );
    }

    #[test]
    fn test_colocation_plain_sorts_options() {
        let colocation = ColocationConstraint {
            id: "c".to_string(),
            rsc: Some("A".to_string()),
            with_rsc: Some("B".to_string()),
            score: Some("INFINITY".to_string()),
            rsc_role: Some("Master".to_string()),
            with_rsc_role: Some("Started".to_string()),
            ..Default::default()
        };
        assert_eq!(
            colocation_plain(&colocation, false),
            "A with B (score:INFINITY) (rsc-role:Master) (with-rsc-role:Started)"
        );
    }

    #[test]
    fn test_ticket_plain_role_prefix() {
        let ticket = TicketConstraint {
            id: "ticket-T-A-Master".to_string(),
            ticket: Some("T".to_string()),
            rsc: Some("A".to_string()),
            rsc_role: Some("Master".to_string()),
            loss_policy: Some("fence".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ticket_plain(&ticket, true),
            "Master A loss-policy=fence ticket=T (id:ticket-T-A-Master)"
        );
    }

    #[test]
    fn test_set_constraint_plain() {
        let mut doc = Document::new();
        let c = doc.append_constraint(Element::Order(OrderConstraint {
            id: "order_set_A_B".to_string(),
            kind: Some("Optional".to_string()),
            ..Default::default()
        }));
        let s = doc
            .append_child(
                c,
                Element::ResourceSet(ResourceSet {
                    id: "order_set_A_B_set".to_string(),
                    sequential: Some("false".to_string()),
                    ..Default::default()
                }),
            )
            .unwrap();
        for rsc in ["A", "B"] {
            doc.append_child(s, Element::ResourceRef(ResourceRef::new(rsc)))
                .unwrap();
        }
        assert_eq!(
            set_constraint_plain(&doc, c, true),
            "set A B sequential=false (id:order_set_A_B_set) setoptions kind=Optional (id:order_set_A_B)"
        );
        assert_eq!(
            set_constraint_plain(&doc, c, false),
            "set A B sequential=false setoptions kind=Optional"
        );
    }
}
