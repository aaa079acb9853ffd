//! `ticket add`

use crate::cib::Cib;
use crate::document::Element;
use crate::duplicates::find_ticket_duplicates;
use crate::errors::{CibError, Result};
use crate::model::constraint::{LOSS_POLICIES, ROLES};
use crate::model::{capitalize, TicketConstraint};
use crate::options::CommandOptions;

use super::{check_allowed, duplicate_error};

const TICKET_OPTIONS: &[&str] = &["id", "loss-policy", "rsc-role"];

/// Parsed `ticket add` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSpec {
    pub ticket: String,
    pub rsc: String,
    pub role: Option<String>,
    pub options: Vec<(String, String)>,
}

/// Parse `<ticket> [role] <rsc> [opt=val]...`
///
/// # Errors
///
/// `Usage` when the positional part is not one or two tokens after the
/// ticket name.
pub fn parse_ticket_add_args(argv: &[String]) -> Result<TicketSpec> {
    let usage = || {
        CibError::usage(
            "ticket add",
            "usage: constraint ticket add <ticket> [<role>] <resource id> [options] [id=constraint-id]",
        )
    };
    let split = argv.iter().position(|t| t.contains('=')).unwrap_or(argv.len());
    let (info, options) = argv.split_at(split);
    let Some((ticket, resource_part)) = info.split_first() else {
        return Err(usage());
    };
    let (role, rsc) = match resource_part {
        [rsc] => (None, rsc.clone()),
        [role, rsc] => (Some(role.clone()), rsc.clone()),
        _ => return Err(usage()),
    };
    let options = options
        .iter()
        .map(|t| match t.split_once('=') {
            Some((name, value)) => Ok((name.to_string(), value.to_string())),
            None => Err(usage()),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TicketSpec {
        ticket: ticket.clone(),
        rsc,
        role,
        options,
    })
}

/// `ticket add`
///
/// The id defaults to `ticket-<ticket>-<rsc>[-<role>]`, made unique.
///
/// # Errors
///
/// `InvalidResource`, `BadOption` unless forced, `InvalidOptionValue` for
/// the role or `loss-policy`, `InvalidId` / `IdInUse` for `id=`, and
/// `DuplicateConstraint` unless forced.
pub fn ticket_add(cib: &mut Cib, spec: &TicketSpec, opts: &CommandOptions) -> Result<Vec<String>> {
    let rsc = cib.constraint_resource(&spec.rsc, opts.force, opts.autocorrect)?;

    let mut ticket = TicketConstraint {
        ticket: Some(spec.ticket.clone()),
        rsc: Some(rsc.clone()),
        ..Default::default()
    };
    if let Some(role) = &spec.role {
        let role = capitalize(role);
        check_allowed("rsc-role", &role, ROLES)?;
        ticket.rsc_role = Some(role);
    }

    let mut explicit_id = None;
    for (name, value) in &spec.options {
        if !TICKET_OPTIONS.contains(&name.as_str()) && !opts.force {
            return Err(CibError::BadOption { name: name.clone() });
        }
        match name.as_str() {
            "id" => {
                cib.check_new_id(value, "constraint id")?;
                explicit_id = Some(value.clone());
            }
            "loss-policy" => {
                check_allowed(name, value, LOSS_POLICIES)?;
                ticket.loss_policy = Some(value.clone());
            }
            "rsc-role" => {
                let role = capitalize(value);
                check_allowed(name, &role, ROLES)?;
                ticket.rsc_role = Some(role);
            }
            _ => ticket.set_attribute(name, value.as_str()),
        }
    }

    ticket.id = match explicit_id {
        Some(id) => id,
        None => {
            let mut base = format!("ticket-{}-{}", spec.ticket, rsc);
            if let Some(role) = &ticket.rsc_role {
                base = format!("{}-{}", base, role);
            }
            cib.allocate_unique_id(&base)
        }
    };

    let node = cib.constraints.append_constraint(Element::Ticket(ticket));
    if !opts.force {
        let duplicates = find_ticket_duplicates(&cib.constraints, node);
        if !duplicates.is_empty() {
            return Err(duplicate_error(&cib.constraints, &duplicates));
        }
    }
    Ok(Vec::new())
}
