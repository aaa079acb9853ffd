//! `order set`, `colocation set` and `ticket set`

use crate::cib::Cib;
use crate::document::Element;
use crate::errors::{CibError, Result};
use crate::model::constraint::{ACTIONS, BOOLEAN_VALUES, LOSS_POLICIES, ORDER_KINDS, ROLES};
use crate::model::{
    capitalize, ColocationConstraint, OrderConstraint, ResourceRef, ResourceSet, TicketConstraint,
};
use crate::options::CommandOptions;
use crate::parse::is_score;

use super::check_allowed;

/// Constraint kind built from resource sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetConstraintKind {
    Order,
    Colocation,
    Ticket,
}

impl SetConstraintKind {
    fn command(self) -> &'static str {
        match self {
            SetConstraintKind::Order => "order set",
            SetConstraintKind::Colocation => "colocation set",
            SetConstraintKind::Ticket => "ticket set",
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            SetConstraintKind::Order => "order",
            SetConstraintKind::Colocation => "colocation",
            SetConstraintKind::Ticket => "ticket",
        }
    }

    fn set_options(self) -> &'static [&'static str] {
        match self {
            SetConstraintKind::Order => &["action", "require-all", "role", "sequential", "kind"],
            SetConstraintKind::Colocation => &["action", "role", "sequential", "require-all"],
            SetConstraintKind::Ticket => &["action", "role"],
        }
    }

    fn constraint_options(self) -> &'static [&'static str] {
        match self {
            SetConstraintKind::Order => &["id", "kind", "symmetrical"],
            SetConstraintKind::Colocation => &["id", "score"],
            SetConstraintKind::Ticket => &["id", "ticket", "loss-policy"],
        }
    }
}

/// One `set` group: resource ids and its options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSetSpec {
    pub ids: Vec<String>,
    pub options: Vec<(String, String)>,
}

/// Parsed set-constraint arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetArgs {
    pub sets: Vec<ResourceSetSpec>,
    pub options: Vec<(String, String)>,
}

fn split_options(tokens: &[String]) -> Vec<(String, String)> {
    tokens
        .iter()
        .filter_map(|t| t.split_once('='))
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect()
}

/// Parse `<rsc>... [opt=val]... [set <rsc>... [opt=val]...]... [setoptions opt=val...]`
///
/// # Errors
///
/// `Usage` for an empty set or a bare `setoptions`.
pub fn parse_set_args(kind: SetConstraintKind, argv: &[String]) -> Result<SetArgs> {
    let (set_part, options) = match argv.iter().position(|t| t == "setoptions") {
        Some(pos) => {
            let tail = &argv[pos + 1..];
            if tail.is_empty() {
                return Err(CibError::usage(kind.command(), "missing options after 'setoptions'"));
            }
            (&argv[..pos], split_options(tail))
        }
        None => (argv, Vec::new()),
    };

    let sets: Vec<ResourceSetSpec> = set_part
        .split(|t| t == "set")
        .map(|group| ResourceSetSpec {
            ids: group.iter().filter(|t| !t.contains('=')).cloned().collect(),
            options: split_options(group),
        })
        .collect();

    if sets.iter().any(|s| s.ids.is_empty()) {
        return Err(CibError::usage(
            kind.command(),
            "resource set must contain at least one resource",
        ));
    }
    Ok(SetArgs { sets, options })
}

fn check_name(name: &str, allowed: &[&str], force: bool) -> Result<()> {
    if allowed.contains(&name) || force {
        Ok(())
    } else {
        Err(CibError::BadOption {
            name: name.to_string(),
        })
    }
}

fn validated_set_options(
    kind: SetConstraintKind,
    options: &[(String, String)],
    force: bool,
) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for (name, value) in options {
        check_name(name, kind.set_options(), force)?;
        let value = match name.as_str() {
            "action" => {
                check_allowed(name, value, ACTIONS)?;
                value.clone()
            }
            "role" => {
                let role = capitalize(value);
                check_allowed(name, &role, ROLES)?;
                role
            }
            "sequential" | "require-all" => {
                let lowered = value.to_lowercase();
                check_allowed(name, &lowered, BOOLEAN_VALUES)?;
                lowered
            }
            "kind" => {
                check_allowed(name, value, ORDER_KINDS)?;
                value.clone()
            }
            _ => value.clone(),
        };
        out.push((name.clone(), value));
    }
    Ok(out)
}

fn validated_constraint_options(
    cib: &Cib,
    kind: SetConstraintKind,
    options: &[(String, String)],
    force: bool,
) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for (name, value) in options {
        check_name(name, kind.constraint_options(), force)?;
        let value = match name.as_str() {
            "id" => {
                cib.check_new_id(value, "constraint id")?;
                value.clone()
            }
            "kind" => {
                check_allowed(name, value, ORDER_KINDS)?;
                value.clone()
            }
            "symmetrical" => {
                let lowered = value.to_lowercase();
                check_allowed(name, &lowered, BOOLEAN_VALUES)?;
                lowered
            }
            "score" => {
                if !is_score(value) {
                    return Err(CibError::InvalidScore {
                        score: value.clone(),
                    });
                }
                value.clone()
            }
            "loss-policy" => {
                check_allowed(name, value, LOSS_POLICIES)?;
                value.clone()
            }
            _ => value.clone(),
        };
        out.push((name.clone(), value));
    }

    let has = |wanted: &str| out.iter().any(|(name, _)| name == wanted);
    if kind == SetConstraintKind::Ticket && !has("ticket") {
        return Err(CibError::usage(
            kind.command(),
            "required option 'ticket' is missing",
        ));
    }
    if kind == SetConstraintKind::Colocation && !has("score") {
        out.push(("score".to_string(), "INFINITY".to_string()));
    }
    Ok(out)
}

/// Create an order, colocation or ticket constraint from resource sets
///
/// The constraint id defaults to `<kind>_set_<ids>[_set_<ids>]...`, each set
/// id to `<constraint id>_set`, both made unique.
///
/// # Errors
///
/// `InvalidResource` for set members, `BadOption` for unknown names unless
/// forced, `InvalidOptionValue` / `InvalidScore` for bad values, `InvalidId`
/// / `IdInUse` for `id=`, and `Usage` for a ticket set without `ticket=`.
pub fn create_with_set(
    cib: &mut Cib,
    kind: SetConstraintKind,
    args: &SetArgs,
    opts: &CommandOptions,
) -> Result<Vec<String>> {
    let mut sets = Vec::with_capacity(args.sets.len());
    for set in &args.sets {
        let ids = set
            .ids
            .iter()
            .map(|id| cib.constraint_resource(id, opts.force, opts.autocorrect))
            .collect::<Result<Vec<_>>>()?;
        let options = validated_set_options(kind, &set.options, opts.force)?;
        sets.push((ids, options));
    }
    let mut options = validated_constraint_options(cib, kind, &args.options, opts.force)?;

    if !options.iter().any(|(name, _)| name == "id") {
        let base = sets.iter().fold(kind.id_prefix().to_string(), |acc, (ids, _)| {
            format!("{}_set_{}", acc, ids.join("_"))
        });
        options.insert(0, ("id".to_string(), cib.allocate_unique_id(&base)));
    }

    let element = match kind {
        SetConstraintKind::Order => {
            let mut c = OrderConstraint::default();
            for (name, value) in &options {
                c.set_attribute(name, value.as_str());
            }
            Element::Order(c)
        }
        SetConstraintKind::Colocation => {
            let mut c = ColocationConstraint::default();
            for (name, value) in &options {
                c.set_attribute(name, value.as_str());
            }
            Element::Colocation(c)
        }
        SetConstraintKind::Ticket => {
            let mut c = TicketConstraint::default();
            for (name, value) in &options {
                c.set_attribute(name, value.as_str());
            }
            Element::Ticket(c)
        }
    };
    let constraint_id = element.id().unwrap_or_default().to_string();
    let constraint = cib.constraints.append_constraint(element);

    for (ids, set_options) in sets {
        let mut set = ResourceSet {
            id: cib.allocate_unique_id(&format!("{}_set", constraint_id)),
            ..Default::default()
        };
        for (name, value) in &set_options {
            set.set_attribute(name, value.as_str());
        }
        let set_node = cib
            .constraints
            .append_child(constraint, Element::ResourceSet(set))
            .ok_or_else(|| CibError::Internal {
                message: "set constraint vanished while building".to_string(),
            })?;
        for id in ids {
            cib.constraints
                .append_child(set_node, Element::ResourceRef(ResourceRef::new(id)));
        }
    }
    tracing::debug!(constraint_id = %constraint_id, "set constraint created");
    Ok(Vec::new())
}
