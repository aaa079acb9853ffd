//! Order constraint commands

use crate::cib::Cib;
use crate::document::{Element, NodeId, Tag};
use crate::duplicates::find_order_duplicates;
use crate::errors::{CibError, Result};
use crate::model::constraint::BOOLEAN_VALUES;
use crate::model::OrderConstraint;
use crate::options::CommandOptions;

use super::duplicate_error;

/// `order add <first> <then> [symmetrical|nonsymmetrical] [name=value]...`
///
/// Options are passed through to the constraint except `id`, which must be
/// new, and `symmetrical`, which must be a boolean. Without an id one is
/// generated from the resources and the score or kind.
///
/// # Errors
///
/// `InvalidResource`, `InvalidId`, `IdInUse`, `InvalidOptionValue` and
/// `DuplicateConstraint` unless forced.
pub fn order_add(
    cib: &mut Cib,
    first: &str,
    then: &str,
    tokens: &[String],
    opts: &CommandOptions,
) -> Result<Vec<String>> {
    let first = cib.constraint_resource(first, opts.force, opts.autocorrect)?;
    let then = cib.constraint_resource(then, opts.force, opts.autocorrect)?;

    let mut options: Vec<(String, String)> = Vec::new();
    let mut id_specified = false;
    let mut symmetrical = None;
    for token in tokens {
        match token.as_str() {
            "symmetrical" => symmetrical = Some("true".to_string()),
            "nonsymmetrical" => symmetrical = Some("false".to_string()),
            _ => {
                let Some((name, value)) = token.split_once('=') else {
                    continue;
                };
                match name {
                    "id" => {
                        cib.check_new_id(value, "constraint id")?;
                        id_specified = true;
                        options.push((name.to_string(), value.to_string()));
                    }
                    "symmetrical" => {
                        let lowered = value.to_lowercase();
                        if !BOOLEAN_VALUES.contains(&lowered.as_str()) {
                            return Err(CibError::InvalidOptionValue {
                                option: "symmetrical".to_string(),
                                value: value.to_string(),
                                allowed: BOOLEAN_VALUES.join(", "),
                            });
                        }
                        symmetrical = Some(lowered);
                    }
                    _ => options.push((name.to_string(), value.to_string())),
                }
            }
        }
    }
    if let Some(sym) = symmetrical {
        options.push(("symmetrical".to_string(), sym));
    }

    let listed: Vec<String> = options
        .iter()
        .filter(|(name, _)| name != "kind" && name != "score")
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    let options_text = if options.is_empty() {
        String::new()
    } else {
        format!(" (Options: {})", listed.join(" "))
    };

    let (score_kind, id_suffix) = options
        .iter()
        .find_map(|(name, value)| match name.as_str() {
            "score" => Some((format!("score: {}", value), value.clone())),
            "kind" => Some((format!("kind: {}", value), value.clone())),
            _ => None,
        })
        .unwrap_or_else(|| ("kind: Mandatory".to_string(), "mandatory".to_string()));

    if !id_specified {
        let id = cib.allocate_unique_id(&format!("order-{}-{}-{}", first, then, id_suffix));
        options.push(("id".to_string(), id));
    }

    let mut order = OrderConstraint {
        first: Some(first.clone()),
        then: Some(then.clone()),
        ..Default::default()
    };
    for (name, value) in &options {
        order.set_attribute(name, value.as_str());
    }

    let node = cib.constraints.append_constraint(Element::Order(order));
    if !opts.force {
        let duplicates = find_order_duplicates(&cib.constraints, node);
        if !duplicates.is_empty() {
            return Err(duplicate_error(&cib.constraints, &duplicates));
        }
    }

    Ok(vec![format!(
        "Adding {} {} ({}){}",
        first, then, score_kind, options_text
    )])
}

/// `order remove <rsc>...`
///
/// Removes order constraints naming a resource as `first` or `then`, then
/// every `resource_ref` to it, pruning emptied sets and constraints.
///
/// # Errors
///
/// `NoMatchingResources` when nothing referenced any of the resources.
pub fn order_remove(cib: &mut Cib, resources: &[String]) -> Result<Vec<String>> {
    let mut found = false;
    for resource in resources {
        let direct: Vec<NodeId> = cib
            .constraints
            .elements_by_tag(Tag::Order)
            .into_iter()
            .filter(|node| {
                matches!(
                    cib.constraints.element(*node),
                    Some(Element::Order(o))
                        if o.first.as_deref() == Some(resource.as_str())
                            || o.then.as_deref() == Some(resource.as_str())
                )
            })
            .collect();
        for node in direct {
            cib.constraints.remove(node);
            found = true;
        }

        let refs = resource_refs_to(cib, resource);
        for reference in refs {
            if cib.constraints.contains(reference) {
                cib.constraints.remove_resource_ref(reference);
                found = true;
            }
        }
    }

    if !found {
        return Err(CibError::NoMatchingResources {
            resource_ids: resources.to_vec(),
        });
    }
    Ok(Vec::new())
}

/// Every `resource_ref` naming `resource`, in any constraint
pub(crate) fn resource_refs_to(cib: &Cib, resource: &str) -> Vec<NodeId> {
    cib.constraints
        .elements_by_tag(Tag::ResourceRef)
        .into_iter()
        .filter(|node| {
            matches!(cib.constraints.element(*node), Some(Element::ResourceRef(r)) if r.id == resource)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::model::{ResourceIndex, ResourceKind};

    fn cib() -> Cib {
        let mut resources = ResourceIndex::new();
        for id in ["A", "B"] {
            resources.insert(id, ResourceKind::Primitive, None);
        }
        Cib::new(resources, Document::new())
    }

    fn args(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_add_message_and_generated_id() {
        let mut cib = cib();
        let out = order_add(&mut cib, "A", "B", &args("kind=Optional"), &CommandOptions::default())
            .unwrap();
        assert_eq!(out, vec!["Adding A B (kind: Optional) (Options: )"]);
        assert!(cib.id_exists("order-A-B-Optional"));
    }

    #[test]
    fn test_symmetry_keyword_and_options_text() {
        let mut cib = cib();
        let out = order_add(
            &mut cib,
            "A",
            "B",
            &args("nonsymmetrical score=10"),
            &CommandOptions::default(),
        )
        .unwrap();
        assert_eq!(out, vec!["Adding A B (score: 10) (Options: symmetrical=false)"]);
        assert!(cib.id_exists("order-A-B-10"));
    }

    #[test]
    fn test_invalid_symmetrical_value() {
        let mut cib = cib();
        let err = order_add(&mut cib, "A", "B", &args("symmetrical=maybe"), &CommandOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid symmetrical value 'maybe', allowed values are: true, false"
        );
    }

    #[test]
    fn test_remove_without_match_fails() {
        let mut cib = cib();
        assert!(matches!(
            order_remove(&mut cib, &args("A")),
            Err(CibError::NoMatchingResources { .. })
        ));
    }
}
