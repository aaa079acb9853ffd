//! Removal by id and rule management on existing location constraints

use crate::cib::Cib;
use crate::document::{Document, Element, NodeId, Tag};
use crate::errors::{CibError, Result};
use crate::options::CommandOptions;
use crate::rules;

use super::location::check_rule_duplicates;

/// Result of removing several ids; each id succeeds or fails on its own
#[derive(Debug, Clone, Default)]
pub struct BatchRemoval {
    pub lines: Vec<String>,
    pub removed: Vec<String>,
    pub failures: Vec<CibError>,
}

impl BatchRemoval {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// `constraint remove <id>...`
///
/// Failures do not stop later ids; whatever was removed stays removed.
pub fn constraint_remove(cib: &mut Cib, ids: &[String]) -> BatchRemoval {
    ids.iter().fold(BatchRemoval::default(), |mut batch, id| {
        match remove_by_id(cib, id) {
            Ok(lines) => {
                batch.lines.extend(lines);
                batch.removed.push(id.clone());
            }
            Err(err) => {
                tracing::debug!(constraint_id = %id, error = %err, "constraint removal failed");
                batch.failures.push(err);
            }
        }
        batch
    })
}

/// Remove the constraint with `id`, or else the rule with `id`
///
/// The rule may be nested at any depth. A nested rule left without children
/// goes with it, and so does a location constraint left without rules.
///
/// # Errors
///
/// `ConstraintNotFound` when neither exists.
pub fn remove_by_id(cib: &mut Cib, id: &str) -> Result<Vec<String>> {
    let doc = &mut cib.constraints;
    let top_level = doc
        .constraints()
        .into_iter()
        .find(|node| doc.element(*node).and_then(Element::id) == Some(id));
    if let Some(node) = top_level {
        doc.remove(node);
        return Ok(Vec::new());
    }

    for node in doc.elements_by_tag(Tag::Rule) {
        let Some(Element::Rule(rule)) = doc.element_mut(node) else {
            continue;
        };
        let emptied = if rule.id == id {
            true
        } else if rule.remove_nested_rule(id) {
            rule.children.is_empty()
        } else {
            continue;
        };
        if emptied {
            remove_rule_node(doc, node);
        }
        return Ok(Vec::new());
    }

    Err(CibError::ConstraintNotFound {
        constraint_id: id.to_string(),
    })
}

fn remove_rule_node(doc: &mut Document, rule: NodeId) {
    let parent = doc.parent(rule);
    doc.remove(rule);
    if let Some(parent) = parent {
        if parent != doc.root() && doc.children_by_tag(parent, Tag::Rule).is_empty() {
            doc.remove(parent);
        }
    }
}

/// `rule remove <rule-id>`
///
/// # Errors
///
/// `RuleNotFound` when no location constraint owns a rule with the id.
pub fn rule_remove(cib: &mut Cib, rule_id: &str) -> Result<Vec<String>> {
    let doc = &mut cib.constraints;
    let owner = doc.elements_by_tag(Tag::Location).into_iter().find_map(|location| {
        doc.children_by_tag(location, Tag::Rule)
            .into_iter()
            .find(|rule| doc.element(*rule).and_then(Element::id) == Some(rule_id))
            .map(|rule| (location, rule))
    });
    let Some((location, rule)) = owner else {
        return Err(CibError::RuleNotFound {
            rule_id: rule_id.to_string(),
        });
    };

    if doc.children(location).len() > 1 {
        doc.remove(rule);
        Ok(vec![format!("Removing Rule: {}", rule_id)])
    } else {
        let constraint_id = doc
            .element(location)
            .and_then(Element::id)
            .unwrap_or_default()
            .to_string();
        doc.remove(location);
        Ok(vec![format!("Removing Constraint: {}", constraint_id)])
    }
}

/// `rule add <constraint-id> [rule options] <expression>`
///
/// # Errors
///
/// `RuleParentNotFound` for an unknown location constraint, rule engine
/// errors, and `DuplicateConstraint` unless forced.
pub fn rule_add(
    cib: &mut Cib,
    constraint_id: &str,
    tokens: &[String],
    opts: &CommandOptions,
) -> Result<Vec<String>> {
    let constraint: NodeId = cib
        .constraints
        .find_constraint(Tag::Location, constraint_id)
        .ok_or_else(|| CibError::RuleParentNotFound {
            constraint_id: constraint_id.to_string(),
        })?;
    let (options, rule_tokens) = rules::parse_argv(tokens, &[]);
    rules::add_rule(cib, constraint, options, &rule_tokens)?;
    check_rule_duplicates(cib, constraint, opts)?;
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::model::{LocationConstraint, OrderConstraint, ResourceIndex, ResourceKind};
    use crate::ops::location::location_rule;

    fn args(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn cib() -> Cib {
        let mut resources = ResourceIndex::new();
        resources.insert("R1", ResourceKind::Primitive, None);
        let mut cib = Cib::new(resources, Document::new());
        cib.constraints.append_constraint(Element::Order(OrderConstraint {
            id: "o1".to_string(),
            first: Some("R1".to_string()),
            then: Some("R2".to_string()),
            ..Default::default()
        }));
        cib
    }

    #[test]
    fn test_batch_keeps_going_after_failure() {
        let mut cib = cib();
        let batch = constraint_remove(&mut cib, &args("missing o1"));
        assert_eq!(batch.removed, vec!["o1".to_string()]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(
            batch.failures[0].to_string(),
            "Unable to find constraint - 'missing'"
        );
        assert!(cib.constraints.is_empty());
    }

    #[test]
    fn test_removing_last_rule_drops_location() {
        let mut cib = cib();
        location_rule(
            &mut cib,
            "R1",
            &args("constraint-id=loc1 defined pingd"),
            &CommandOptions::default(),
        )
        .unwrap();
        remove_by_id(&mut cib, "loc1-rule").unwrap();
        assert!(cib.constraints.find_constraint(Tag::Location, "loc1").is_none());
    }

    #[test]
    fn test_rule_remove_messages() {
        let mut cib = cib();
        let opts = CommandOptions::default();
        location_rule(&mut cib, "R1", &args("constraint-id=loc1 defined pingd"), &opts).unwrap();
        rule_add(&mut cib, "loc1", &args("not_defined foo"), &opts).unwrap();

        assert_eq!(
            rule_remove(&mut cib, "loc1-rule").unwrap(),
            vec!["Removing Rule: loc1-rule"]
        );
        assert_eq!(
            rule_remove(&mut cib, "loc1-rule-1").unwrap(),
            vec!["Removing Constraint: loc1"]
        );
        assert!(matches!(
            rule_remove(&mut cib, "loc1-rule"),
            Err(CibError::RuleNotFound { .. })
        ));
    }

    #[test]
    fn test_rule_add_needs_location() {
        let mut cib = cib();
        cib.constraints.append_constraint(Element::Location(LocationConstraint {
            id: "plain".to_string(),
            rsc: Some("R1".to_string()),
            node: Some("N1".to_string()),
            score: Some("10".to_string()),
            ..Default::default()
        }));
        let err = rule_add(&mut cib, "nope", &args("defined x"), &CommandOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Unable to find constraint: nope");

        rule_add(&mut cib, "plain", &args("defined x"), &CommandOptions::default()).unwrap();
        match cib
            .constraints
            .find_constraint(Tag::Location, "plain")
            .and_then(|n| cib.constraints.element(n))
        {
            Some(Element::Location(l)) => {
                assert_eq!(l.node, None);
                assert_eq!(l.score, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
