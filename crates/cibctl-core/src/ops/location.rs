//! Location constraint commands

use crate::cib::Cib;
use crate::document::{Element, NodeId, Tag};
use crate::duplicates::find_location_rule_duplicates;
use crate::errors::{CibError, Result};
use crate::ids::validate_xml_id;
use crate::model::LocationConstraint;
use crate::options::CommandOptions;
use crate::parse::is_score;
use crate::rules::{self, render_detailed};

/// Direction of `location <rsc> prefers|avoids`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Prefers,
    Avoids,
}

fn locations_matching(cib: &Cib, pred: impl Fn(&LocationConstraint) -> bool) -> Vec<NodeId> {
    cib.constraints
        .elements_by_tag(Tag::Location)
        .into_iter()
        .filter(|node| matches!(cib.constraints.element(*node), Some(Element::Location(l)) if pred(l)))
        .collect()
}

/// `location add <id> <rsc> <node> <score> [resource-discovery=<value>]`
///
/// Replaces any location constraint with the same id or the same
/// (rsc, node) pair.
///
/// # Errors
///
/// `Usage` for options without `=`, `BadOption` for names other than
/// `resource-discovery` unless forced, `InvalidId`, `IdInUse` when a
/// non-location element owns the id, `InvalidResource` and `InvalidScore`.
pub fn location_add(
    cib: &mut Cib,
    id: &str,
    rsc: &str,
    node: &str,
    score: &str,
    options: &[String],
    opts: &CommandOptions,
) -> Result<Vec<String>> {
    validate_xml_id(id, "constraint id")?;

    let mut parsed = Vec::new();
    for token in options {
        let Some((name, value)) = token.split_once('=') else {
            return Err(CibError::usage(
                "location add",
                format!("bad option '{}'", token),
            ));
        };
        if name != "resource-discovery" && !opts.force {
            return Err(CibError::BadOption {
                name: name.to_string(),
            });
        }
        parsed.push((name, value));
    }

    let rsc = cib.constraint_resource(rsc, opts.force, opts.autocorrect)?;
    if !is_score(score) {
        return Err(CibError::InvalidScore {
            score: score.to_string(),
        });
    }

    let replaced = locations_matching(cib, |l| {
        l.id == id
            || (l.rsc.as_deref() == Some(rsc.as_str()) && l.node.as_deref() == Some(node))
    });
    let owns_id = replaced.iter().any(|n| cib.constraints.element(*n).and_then(Element::id) == Some(id));
    if !owns_id && cib.id_exists(id) {
        return Err(CibError::IdInUse { id: id.to_string() });
    }
    for node in replaced {
        cib.constraints.remove(node);
    }

    let mut location = LocationConstraint {
        id: id.to_string(),
        rsc: Some(rsc),
        node: Some(node.to_string()),
        score: Some(score.to_string()),
        ..Default::default()
    };
    for (name, value) in parsed {
        location.set_attribute(name, value);
    }
    tracing::debug!(constraint_id = %id, "location constraint added");
    cib.constraints.append_constraint(Element::Location(location));
    Ok(Vec::new())
}

/// `location remove <id>`
///
/// # Errors
///
/// `LocationNotFound` when no location constraint has the id.
pub fn location_remove(cib: &mut Cib, id: &str) -> Result<Vec<String>> {
    let matching = locations_matching(cib, |l| l.id == id);
    if matching.is_empty() {
        return Err(CibError::LocationNotFound {
            constraint_id: id.to_string(),
        });
    }
    for node in matching {
        cib.constraints.remove(node);
    }
    Ok(Vec::new())
}

/// `location <rsc> prefers|avoids <node>[=<score>]...`
///
/// Each node gets id `location-<rsc>-<node>-<score>`. Avoiding flips the
/// sign of an explicit score by its first character, so `-50` becomes `50`.
///
/// # Errors
///
/// `InvalidScore` for explicit scores, plus anything `location_add` returns.
pub fn location_prefer(
    cib: &mut Cib,
    rsc: &str,
    preference: Preference,
    node_specs: &[String],
    opts: &CommandOptions,
) -> Result<Vec<String>> {
    for spec in node_specs {
        let (node, score) = match spec.split_once('=') {
            None => {
                let score = match preference {
                    Preference::Prefers => "INFINITY",
                    Preference::Avoids => "-INFINITY",
                };
                (spec.as_str(), score.to_string())
            }
            Some((node, score)) => {
                if !is_score(score) {
                    return Err(CibError::InvalidScore {
                        score: score.to_string(),
                    });
                }
                let score = match (preference, score.strip_prefix('-')) {
                    (Preference::Prefers, _) => score.to_string(),
                    (Preference::Avoids, Some(positive)) => positive.to_string(),
                    (Preference::Avoids, None) => format!("-{}", score),
                };
                (node, score)
            }
        };
        let id = format!("location-{}-{}-{}", rsc, node, score);
        location_add(cib, &id, rsc, node, &score, &[], opts)?;
    }
    Ok(Vec::new())
}

/// Reject `constraint` when another rule-based location on the same resource
/// has the same rules
pub(crate) fn check_rule_duplicates(cib: &Cib, constraint: NodeId, opts: &CommandOptions) -> Result<()> {
    if opts.force {
        return Ok(());
    }
    let duplicates = find_location_rule_duplicates(&cib.constraints, constraint);
    if duplicates.is_empty() {
        return Ok(());
    }

    let mut lines = Vec::new();
    for dup in duplicates {
        let id = cib.constraints.element(dup).and_then(Element::id).unwrap_or_default();
        lines.push(format!("  Constraint: {}", id));
        for rule in cib.constraints.children_by_tag(dup, Tag::Rule) {
            if let Some(Element::Rule(rule)) = cib.constraints.element(rule) {
                lines.extend(render_detailed(rule, true, "    "));
            }
        }
    }
    Err(CibError::DuplicateConstraint { rendered: lines })
}

/// `location <rsc> rule [constraint-id=..] [resource-discovery=..] [rule options] <expression>`
///
/// # Errors
///
/// `InvalidResource`, `InvalidId` / `IdInUse` for `constraint-id`, rule
/// errors from the rule engine and `DuplicateConstraint` unless forced.
pub fn location_rule(
    cib: &mut Cib,
    rsc: &str,
    tokens: &[String],
    opts: &CommandOptions,
) -> Result<Vec<String>> {
    let rsc = cib.constraint_resource(rsc, opts.force, opts.autocorrect)?;
    let (mut options, rule_tokens) =
        rules::parse_argv(tokens, &["constraint-id", "resource-discovery"]);

    let mut location = LocationConstraint {
        rsc: Some(rsc.clone()),
        ..Default::default()
    };
    if let Some(rd) = options.remove("resource-discovery").filter(|v| !v.is_empty()) {
        location.resource_discovery = Some(rd);
    }
    location.id = match options.remove("constraint-id").filter(|v| !v.is_empty()) {
        Some(id) => {
            cib.check_new_id(&id, "constraint id")?;
            id
        }
        None => cib.allocate_unique_id(&format!("location-{}", rsc)),
    };

    let constraint = cib.constraints.append_constraint(Element::Location(location));
    rules::add_rule(cib, constraint, options, &rule_tokens)?;
    check_rule_duplicates(cib, constraint, opts)?;
    Ok(Vec::new())
}
