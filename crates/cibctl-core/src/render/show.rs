//! `constraint ... show` listings

use std::collections::BTreeMap;

use super::plain::{colocation_plain, order_plain, set_constraint_plain, ticket_plain};
use crate::document::{Document, Element, NodeId, Tag};
use crate::model::LocationConstraint;
use crate::rules::render_detailed;

/// How `location show` groups its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationView {
    #[default]
    ByResource,
    ByNode,
}

struct LocationEntry<'a> {
    id: &'a str,
    rsc: &'a str,
    node: &'a str,
    score: String,
    role: &'a str,
    resource_discovery: &'a str,
}

impl<'a> LocationEntry<'a> {
    fn new(location: &'a LocationConstraint) -> Self {
        let score = match location.score.as_deref() {
            None | Some("") => "0".to_string(),
            Some(score) => score.to_string(),
        };
        Self {
            id: &location.id,
            rsc: location.rsc.as_deref().unwrap_or_default(),
            node: location.node.as_deref().unwrap_or_default(),
            score,
            role: location.role.as_deref().unwrap_or_default(),
            resource_discovery: location.resource_discovery.as_deref().unwrap_or_default(),
        }
    }

    fn positive(&self) -> bool {
        match self.score.as_str() {
            "INFINITY" | "+INFINITY" => true,
            "-INFINITY" => false,
            other => other.parse::<i64>().map(|n| n >= 0).unwrap_or(true),
        }
    }

    fn qualifiers(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if !self.role.is_empty() {
            parts.push(format!("(role: {})", self.role));
        }
        if !self.resource_discovery.is_empty() {
            parts.push(format!("(resource-discovery={})", self.resource_discovery));
        }
        parts
    }
}

fn location_nodes(doc: &Document) -> Vec<(NodeId, &LocationConstraint)> {
    doc.elements_by_tag(Tag::Location)
        .into_iter()
        .filter_map(|node| match doc.element(node) {
            Some(Element::Location(location)) => Some((node, location)),
            _ => None,
        })
        .collect()
}

/// `Location Constraints:` listing
///
/// `filter` restricts output to the named resources (by resource) or nodes
/// (by node). Rule-based constraints are listed under their resource.
pub fn location_show(doc: &Document, view: LocationView, filter: &[String], full: bool) -> Vec<String> {
    let mut lines = vec!["Location Constraints:".to_string()];
    let locations = location_nodes(doc);
    let passes = |name: &str| filter.is_empty() || filter.iter().any(|f| f == name);

    match view {
        LocationView::ByResource => {
            let mut by_rsc: BTreeMap<&str, Vec<LocationEntry<'_>>> = BTreeMap::new();
            for (_, location) in &locations {
                let entry = LocationEntry::new(location);
                by_rsc.entry(entry.rsc).or_default().push(entry);
            }
            for (rsc, entries) in &by_rsc {
                if !passes(rsc) {
                    continue;
                }
                lines.push(format!("  Resource: {}", rsc));
                for (positive, label) in [(true, "    Enabled on:"), (false, "    Disabled on:")] {
                    for entry in entries
                        .iter()
                        .filter(|e| e.positive() == positive && !e.node.is_empty())
                    {
                        let mut parts = vec![
                            label.to_string(),
                            entry.node.to_string(),
                            format!("(score:{})", entry.score),
                        ];
                        parts.extend(entry.qualifiers());
                        if full {
                            parts.push(format!("(id:{})", entry.id));
                        }
                        lines.push(parts.join(" "));
                    }
                }
                lines.extend(location_rules(doc, &locations, rsc, full));
            }
        }
        LocationView::ByNode => {
            let mut by_node: BTreeMap<&str, Vec<LocationEntry<'_>>> = BTreeMap::new();
            for (_, location) in &locations {
                let entry = LocationEntry::new(location);
                if !entry.node.is_empty() {
                    by_node.entry(entry.node).or_default().push(entry);
                }
            }
            for (node, entries) in &by_node {
                if !passes(node) {
                    continue;
                }
                lines.push(format!("  Node: {}", node));
                for (positive, label) in [
                    (true, "    Allowed to run:"),
                    (false, "    Not allowed to run:"),
                ] {
                    let matching: Vec<_> =
                        entries.iter().filter(|e| e.positive() == positive).collect();
                    if matching.is_empty() {
                        continue;
                    }
                    lines.push(label.to_string());
                    for entry in matching {
                        let mut parts = vec![format!("      {} ({})", entry.rsc, entry.id)];
                        parts.extend(entry.qualifiers());
                        parts.push(format!("Score: {}", entry.score));
                        lines.push(parts.join(" "));
                    }
                }
            }

            let mut rule_resources: Vec<&str> = Vec::new();
            for (node, location) in &locations {
                let rsc = location.rsc.as_deref().unwrap_or_default();
                if !doc.children_by_tag(*node, Tag::Rule).is_empty() && !rule_resources.contains(&rsc) {
                    rule_resources.push(rsc);
                }
            }
            for rsc in rule_resources {
                lines.push(format!("  Resource: {}", rsc));
                lines.extend(location_rules(doc, &locations, rsc, false));
            }
        }
    }
    lines
}

/// `Constraint: <id>` blocks with their rules, sorted by constraint id
fn location_rules(
    doc: &Document,
    locations: &[(NodeId, &LocationConstraint)],
    rsc: &str,
    full: bool,
) -> Vec<String> {
    let mut owners: Vec<(NodeId, &LocationConstraint)> = locations
        .iter()
        .filter(|(node, location)| {
            location.rsc.as_deref().unwrap_or_default() == rsc
                && !doc.children_by_tag(*node, Tag::Rule).is_empty()
        })
        .copied()
        .collect();
    owners.sort_by(|a, b| a.1.id.cmp(&b.1.id));

    let mut lines = Vec::new();
    for (node, location) in owners {
        let options = match location.resource_discovery.as_deref() {
            Some(rd) if !rd.is_empty() => format!(" (resource-discovery={})", rd),
            _ => String::new(),
        };
        lines.push(format!("    Constraint: {}{}", location.id, options));
        for rule in doc.children_by_tag(node, Tag::Rule) {
            if let Some(Element::Rule(rule)) = doc.element(rule) {
                lines.extend(render_detailed(rule, full, "      "));
            }
        }
    }
    lines
}

fn simple_and_set(doc: &Document, tag: Tag) -> (Vec<NodeId>, Vec<NodeId>) {
    doc.elements_by_tag(tag)
        .into_iter()
        .filter(|node| doc.parent(*node) == Some(doc.root()))
        .partition(|node| !doc.has_descendant(*node, Tag::ResourceSet))
}

fn kind_show<F>(doc: &Document, tag: Tag, title: &str, full: bool, plain: F) -> Vec<String>
where
    F: Fn(&Element, bool) -> Option<String>,
{
    let (simple, with_sets) = simple_and_set(doc, tag);
    let mut lines = vec![title.to_string()];
    for node in simple {
        if let Some(line) = doc.element(node).and_then(|el| plain(el, full)) {
            lines.push(format!("  {}", line));
        }
    }
    if !with_sets.is_empty() {
        lines.push("  Resource Sets:".to_string());
        for node in with_sets {
            lines.push(format!("    {}", set_constraint_plain(doc, node, full)));
        }
    }
    lines
}

/// `Ordering Constraints:` listing
pub fn order_show(doc: &Document, full: bool) -> Vec<String> {
    kind_show(doc, Tag::Order, "Ordering Constraints:", full, |el, full| match el {
        Element::Order(order) => Some(order_plain(order, full)),
        _ => None,
    })
}

/// `Colocation Constraints:` listing
pub fn colocation_show(doc: &Document, full: bool) -> Vec<String> {
    kind_show(doc, Tag::Colocation, "Colocation Constraints:", full, |el, full| match el {
        Element::Colocation(colocation) => Some(colocation_plain(colocation, full)),
        _ => None,
    })
}

/// `Ticket Constraints:` listing
pub fn ticket_show(doc: &Document, full: bool) -> Vec<String> {
    kind_show(doc, Tag::Ticket, "Ticket Constraints:", full, |el, full| match el {
        Element::Ticket(ticket) => Some(ticket_plain(ticket, full)),
        _ => None,
    })
}

/// Every listing, location first
pub fn constraint_show(doc: &Document, view: LocationView, filter: &[String], full: bool) -> Vec<String> {
    let mut lines = location_show(doc, view, filter, full);
    lines.extend(order_show(doc, full));
    lines.extend(colocation_show(doc, full));
    lines.extend(ticket_show(doc, full));
    lines
}
