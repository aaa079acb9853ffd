//! Command inventory and argument parsing
//!
//! `constraint ...` and `references ...` argument lists are turned into a
//! [`Command`] here; [`crate::apply::apply`] executes it against a `Cib`.

use crate::errors::{CibError, Result};
use crate::model::constraint::ACTIONS;
use crate::ops::colocation::{parse_colocation_args, ColocationSpec};
use crate::ops::location::Preference;
use crate::ops::sets::{parse_set_args, SetArgs, SetConstraintKind};
use crate::ops::ticket::{parse_ticket_add_args, TicketSpec};
use crate::render::LocationView;

/// Every constraint operation the tool performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LocationAdd {
        id: String,
        rsc: String,
        node: String,
        score: String,
        options: Vec<String>,
    },
    LocationRemove {
        id: String,
    },
    LocationPrefer {
        rsc: String,
        preference: Preference,
        nodes: Vec<String>,
    },
    LocationRule {
        rsc: String,
        tokens: Vec<String>,
    },
    LocationShow {
        view: LocationView,
        filter: Vec<String>,
    },

    OrderAdd {
        first: String,
        then: String,
        tokens: Vec<String>,
    },
    OrderRemove {
        resources: Vec<String>,
    },
    OrderShow,

    ColocationAdd(ColocationSpec),
    ColocationRemove {
        rsc: String,
        with_rsc: String,
    },
    ColocationShow,

    TicketAdd(TicketSpec),
    TicketShow,

    /// `order set`, `colocation set` and `ticket set`
    SetCreate {
        kind: SetConstraintKind,
        args: SetArgs,
    },

    ConstraintRemove {
        ids: Vec<String>,
    },
    ConstraintShow {
        view: LocationView,
        filter: Vec<String>,
    },
    ConstraintRef {
        resources: Vec<String>,
    },

    RuleAdd {
        constraint_id: String,
        tokens: Vec<String>,
    },
    RuleRemove {
        rule_id: String,
    },

    /// Drop every constraint reference to a deleted resource
    ReferencesRemove {
        rsc: String,
    },
    /// Move references to a resource onto its enclosing clone or master
    ReferencesReparent {
        rsc: String,
    },
    /// Drop location constraints pinned to a departed node
    ReferencesRemoveNode {
        node: String,
    },
}

impl Command {
    /// Operation name used in logs and error context
    pub fn name(&self) -> &'static str {
        match self {
            Command::LocationAdd { .. } => "location_add",
            Command::LocationRemove { .. } => "location_remove",
            Command::LocationPrefer { .. } => "location_prefer",
            Command::LocationRule { .. } => "location_rule",
            Command::LocationShow { .. } => "location_show",
            Command::OrderAdd { .. } => "order_add",
            Command::OrderRemove { .. } => "order_remove",
            Command::OrderShow => "order_show",
            Command::ColocationAdd(_) => "colocation_add",
            Command::ColocationRemove { .. } => "colocation_remove",
            Command::ColocationShow => "colocation_show",
            Command::TicketAdd(_) => "ticket_add",
            Command::TicketShow => "ticket_show",
            Command::SetCreate { kind, .. } => match kind {
                SetConstraintKind::Order => "order_set",
                SetConstraintKind::Colocation => "colocation_set",
                SetConstraintKind::Ticket => "ticket_set",
            },
            Command::ConstraintRemove { .. } => "constraint_remove",
            Command::ConstraintShow { .. } => "constraint_show",
            Command::ConstraintRef { .. } => "constraint_ref",
            Command::RuleAdd { .. } => "rule_add",
            Command::RuleRemove { .. } => "rule_remove",
            Command::ReferencesRemove { .. } => "references_remove",
            Command::ReferencesReparent { .. } => "references_reparent",
            Command::ReferencesRemoveNode { .. } => "references_remove_node",
        }
    }

    /// Constraint, resource, rule or node id the command acts on
    ///
    /// `None` for listings, set constraints and multi-id removals.
    pub fn subject(&self) -> Option<&str> {
        let id = match self {
            Command::LocationAdd { id, .. } | Command::LocationRemove { id } => id,
            Command::LocationPrefer { rsc, .. }
            | Command::LocationRule { rsc, .. }
            | Command::ColocationRemove { rsc, .. }
            | Command::ReferencesRemove { rsc }
            | Command::ReferencesReparent { rsc } => rsc,
            Command::OrderAdd { first, .. } => first,
            Command::ColocationAdd(spec) => &spec.rsc,
            Command::TicketAdd(spec) => &spec.ticket,
            Command::RuleAdd { constraint_id, .. } => constraint_id,
            Command::RuleRemove { rule_id } => rule_id,
            Command::ReferencesRemoveNode { node } => node,
            Command::ConstraintRemove { ids } | Command::OrderRemove { resources: ids } => {
                match ids.as_slice() {
                    [id] => id,
                    _ => return None,
                }
            }
            Command::LocationShow { .. }
            | Command::OrderShow
            | Command::ColocationShow
            | Command::TicketShow
            | Command::SetCreate { .. }
            | Command::ConstraintShow { .. }
            | Command::ConstraintRef { .. } => return None,
        };
        Some(id.as_str())
    }

    /// Listings never write the configuration back
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::LocationShow { .. }
                | Command::OrderShow
                | Command::ColocationShow
                | Command::TicketShow
                | Command::ConstraintShow { .. }
                | Command::ConstraintRef { .. }
        )
    }
}

fn usage(command: &str, text: &str) -> CibError {
    CibError::usage(command, format!("usage: constraint {}", text))
}

fn owned(tokens: &[String]) -> Vec<String> {
    tokens.to_vec()
}

/// `[nodes|resources] [filter...]`
///
/// The first word always selects the view and is never a filter: anything
/// other than `nodes` lists by resource.
fn parse_view(tokens: &[String]) -> (LocationView, Vec<String>) {
    match tokens.split_first() {
        Some((mode, rest)) if mode == "nodes" => (LocationView::ByNode, owned(rest)),
        Some((_, rest)) => (LocationView::ByResource, owned(rest)),
        None => (LocationView::ByResource, Vec::new()),
    }
}

/// Parse the arguments following `constraint`
///
/// No arguments lists every constraint.
///
/// # Errors
///
/// `Usage` for unknown subcommands or wrong argument counts.
pub fn parse_constraint_args(argv: &[String]) -> Result<Command> {
    let Some((sub, rest)) = argv.split_first() else {
        return Ok(Command::ConstraintShow {
            view: LocationView::ByResource,
            filter: Vec::new(),
        });
    };
    match sub.as_str() {
        "location" => parse_location(rest),
        "order" => parse_order(rest),
        "colocation" => parse_colocation(rest),
        "ticket" => parse_ticket(rest),
        "remove" | "delete" => {
            if rest.is_empty() {
                return Err(usage("remove", "remove <constraint id>..."));
            }
            Ok(Command::ConstraintRemove { ids: owned(rest) })
        }
        "show" | "list" => {
            let (view, filter) = parse_view(rest);
            Ok(Command::ConstraintShow { view, filter })
        }
        "ref" => {
            if rest.is_empty() {
                return Err(usage("ref", "ref <resource>..."));
            }
            Ok(Command::ConstraintRef {
                resources: owned(rest),
            })
        }
        "rule" => parse_rule(rest),
        other => Err(CibError::usage(
            "constraint",
            format!("unknown constraint command '{}'", other),
        )),
    }
}

fn parse_location(argv: &[String]) -> Result<Command> {
    let Some((sub, rest)) = argv.split_first() else {
        return Ok(Command::LocationShow {
            view: LocationView::ByResource,
            filter: Vec::new(),
        });
    };
    match sub.as_str() {
        "add" => match rest {
            [id, rsc, node, score, options @ ..] => Ok(Command::LocationAdd {
                id: id.clone(),
                rsc: rsc.clone(),
                node: node.clone(),
                score: score.clone(),
                options: owned(options),
            }),
            _ => Err(usage(
                "location add",
                "location add <id> <resource> <node> <score> [resource-discovery=<option>]",
            )),
        },
        "remove" | "delete" => match rest {
            [id] => Ok(Command::LocationRemove { id: id.clone() }),
            _ => Err(usage("location remove", "location remove <id>")),
        },
        "show" => {
            let (view, filter) = parse_view(rest);
            Ok(Command::LocationShow { view, filter })
        }
        _ => {
            let rsc = sub.clone();
            match rest.split_first() {
                Some((verb, nodes)) if verb == "prefers" || verb == "avoids" => {
                    if nodes.is_empty() {
                        return Err(usage(
                            "location",
                            "location <resource> prefers|avoids <node>[=<score>]...",
                        ));
                    }
                    let preference = if verb == "prefers" {
                        Preference::Prefers
                    } else {
                        Preference::Avoids
                    };
                    Ok(Command::LocationPrefer {
                        rsc,
                        preference,
                        nodes: owned(nodes),
                    })
                }
                Some((verb, tokens)) if verb == "rule" => Ok(Command::LocationRule {
                    rsc,
                    tokens: owned(tokens),
                }),
                _ => Err(usage(
                    "location",
                    "location <resource> prefers|avoids|rule ...",
                )),
            }
        }
    }
}

fn parse_order(argv: &[String]) -> Result<Command> {
    let Some((sub, rest)) = argv.split_first() else {
        return Ok(Command::OrderShow);
    };
    match sub.as_str() {
        "show" => Ok(Command::OrderShow),
        "remove" | "delete" => {
            if rest.is_empty() {
                return Err(usage("order remove", "order remove <resource>..."));
            }
            Ok(Command::OrderRemove {
                resources: owned(rest),
            })
        }
        "set" => Ok(Command::SetCreate {
            kind: SetConstraintKind::Order,
            args: parse_set_args(SetConstraintKind::Order, rest)?,
        }),
        _ => parse_order_shorthand(argv),
    }
}

fn take_action<'a>(rest: &mut &'a [String]) -> String {
    let tokens: &'a [String] = rest;
    match tokens.split_first() {
        Some((action, tail)) if ACTIONS.contains(&action.as_str()) => {
            *rest = tail;
            action.clone()
        }
        _ => "start".to_string(),
    }
}

/// `[action] <first> then [action] <then> [options]`
fn parse_order_shorthand(argv: &[String]) -> Result<Command> {
    let err = || {
        usage(
            "order",
            "order [action] <resource id> then [action] <resource id> [options]",
        )
    };
    if argv.len() < 3 {
        return Err(err());
    }
    let mut rest = argv;

    let first_action = take_action(&mut rest);
    let (first, tail) = rest.split_first().ok_or_else(err)?;
    rest = tail;
    match rest.split_first() {
        Some((word, tail)) if word == "then" => rest = tail,
        _ => return Err(err()),
    }
    let then_action = take_action(&mut rest);
    let (then, tail) = rest.split_first().ok_or_else(err)?;

    let mut tokens = owned(tail);
    tokens.push(format!("first-action={}", first_action));
    tokens.push(format!("then-action={}", then_action));
    Ok(Command::OrderAdd {
        first: first.clone(),
        then: then.clone(),
        tokens,
    })
}

fn parse_colocation(argv: &[String]) -> Result<Command> {
    let Some((sub, rest)) = argv.split_first() else {
        return Ok(Command::ColocationShow);
    };
    match sub.as_str() {
        "show" => Ok(Command::ColocationShow),
        "add" => Ok(Command::ColocationAdd(parse_colocation_args(rest)?)),
        "remove" | "delete" => match rest {
            [rsc, with_rsc] => Ok(Command::ColocationRemove {
                rsc: rsc.clone(),
                with_rsc: with_rsc.clone(),
            }),
            _ => Err(usage(
                "colocation remove",
                "colocation remove <source resource id> <target resource id>",
            )),
        },
        "set" => Ok(Command::SetCreate {
            kind: SetConstraintKind::Colocation,
            args: parse_set_args(SetConstraintKind::Colocation, rest)?,
        }),
        other => Err(CibError::usage(
            "colocation",
            format!("unknown colocation command '{}'", other),
        )),
    }
}

fn parse_ticket(argv: &[String]) -> Result<Command> {
    let Some((sub, rest)) = argv.split_first() else {
        return Ok(Command::TicketShow);
    };
    match sub.as_str() {
        "show" => Ok(Command::TicketShow),
        "add" => Ok(Command::TicketAdd(parse_ticket_add_args(rest)?)),
        "set" => Ok(Command::SetCreate {
            kind: SetConstraintKind::Ticket,
            args: parse_set_args(SetConstraintKind::Ticket, rest)?,
        }),
        other => Err(CibError::usage(
            "ticket",
            format!("unknown ticket command '{}'", other),
        )),
    }
}

fn parse_rule(argv: &[String]) -> Result<Command> {
    match argv {
        [sub, constraint_id, tokens @ ..] if sub == "add" && !tokens.is_empty() => {
            Ok(Command::RuleAdd {
                constraint_id: constraint_id.clone(),
                tokens: owned(tokens),
            })
        }
        [sub, rule_id] if sub == "remove" || sub == "delete" => Ok(Command::RuleRemove {
            rule_id: rule_id.clone(),
        }),
        _ => Err(usage(
            "rule",
            "rule add <constraint id> [rule options] <expression> | rule remove <rule id>",
        )),
    }
}

/// Parse the arguments following `references`
///
/// # Errors
///
/// `Usage` for anything but `remove <rsc>`, `reparent <rsc>` or
/// `remove-node <node>`.
pub fn parse_references_args(argv: &[String]) -> Result<Command> {
    match argv {
        [sub, rsc] if sub == "remove" => Ok(Command::ReferencesRemove { rsc: rsc.clone() }),
        [sub, rsc] if sub == "reparent" => Ok(Command::ReferencesReparent { rsc: rsc.clone() }),
        [sub, node] if sub == "remove-node" => Ok(Command::ReferencesRemoveNode {
            node: node.clone(),
        }),
        _ => Err(CibError::usage(
            "references",
            "usage: references remove <resource> | reparent <resource> | remove-node <node>",
        )),
    }
}
