//! Colocation constraint commands

use crate::cib::Cib;
use crate::document::{Element, NodeId, Tag};
use crate::duplicates::find_colocation_duplicates;
use crate::errors::{CibError, Result};
use crate::model::constraint::DEFAULT_ROLE;
use crate::model::{capitalize, ColocationConstraint};
use crate::options::CommandOptions;
use crate::parse::{is_score_or_opt, parse_score_options};

use super::duplicate_error;

/// Parsed `colocation add` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColocationSpec {
    pub rsc: String,
    pub with_rsc: String,
    pub rsc_role: Option<String>,
    pub with_rsc_role: Option<String>,
    /// Optional score followed by `name=value` options
    pub tokens: Vec<String>,
}

/// Parse `[role] <rsc> with [role] <with-rsc> [score] [options]` or the
/// legacy `<rsc> <with-rsc> [score] [options]`
///
/// Roles are capitalized.
///
/// # Errors
///
/// `Usage` when resources are missing.
pub fn parse_colocation_args(argv: &[String]) -> Result<ColocationSpec> {
    let usage = || {
        CibError::usage(
            "colocation add",
            "usage: constraint colocation add [master|slave] <source resource id> with [master|slave] <target resource id> [score] [options] [id=constraint-id]",
        )
    };
    if argv.len() < 2 {
        return Err(usage());
    }
    let token = |i: usize| argv.get(i).cloned().ok_or_else(usage);

    let mut rsc_role = None;
    let mut with_rsc_role = None;
    let (rsc, with_rsc, pos);
    if argv.len() > 2 && !is_score_or_opt(&argv[2]) {
        let mut i = 0;
        if argv[2] == "with" {
            rsc_role = Some(capitalize(&argv[0]));
            i = 1;
        }
        rsc = token(i)?;
        // skip the resource and "with"
        i += 2;
        let remaining = argv.len().saturating_sub(i);
        if remaining == 1 || argv.get(i + 1).is_some_and(|t| is_score_or_opt(t)) {
            with_rsc = token(i)?;
            i += 1;
        } else {
            with_rsc_role = Some(capitalize(&token(i)?));
            with_rsc = token(i + 1)?;
            i += 2;
        }
        pos = i;
    } else {
        rsc = argv[0].clone();
        with_rsc = argv[1].clone();
        pos = 2;
    }

    Ok(ColocationSpec {
        rsc,
        with_rsc,
        rsc_role,
        with_rsc_role,
        tokens: argv.get(pos..).unwrap_or_default().to_vec(),
    })
}

/// `colocation add`
///
/// A single role defaults the other side to `Started`. Options are applied
/// after the role attributes and may override them.
///
/// # Errors
///
/// `InvalidResource`, `InvalidId` / `IdInUse` for `id=`, and
/// `DuplicateConstraint` unless forced.
pub fn colocation_add(cib: &mut Cib, spec: &ColocationSpec, opts: &CommandOptions) -> Result<Vec<String>> {
    let rsc = cib.constraint_resource(&spec.rsc, opts.force, opts.autocorrect)?;
    let with_rsc = cib.constraint_resource(&spec.with_rsc, opts.force, opts.autocorrect)?;

    let (score, mut pairs) = parse_score_options(&spec.tokens);
    let mut id_given = false;
    for (name, value) in &pairs {
        if name == "id" {
            cib.check_new_id(value, "constraint id")?;
            id_given = true;
        }
    }
    if !id_given {
        let id = cib.allocate_unique_id(&format!("colocation-{}-{}-{}", rsc, with_rsc, score));
        pairs.push(("id".to_string(), id));
    }

    let (rsc_role, with_rsc_role) = match (spec.rsc_role.clone(), spec.with_rsc_role.clone()) {
        (Some(r), None) => (Some(r), Some(DEFAULT_ROLE.to_string())),
        (None, Some(w)) => (Some(DEFAULT_ROLE.to_string()), Some(w)),
        roles => roles,
    };

    let mut colocation = ColocationConstraint {
        rsc: Some(rsc),
        with_rsc: Some(with_rsc),
        score: Some(score),
        rsc_role,
        with_rsc_role,
        ..Default::default()
    };
    for (name, value) in &pairs {
        colocation.set_attribute(name, value.as_str());
    }

    let node = cib.constraints.append_constraint(Element::Colocation(colocation));
    if !opts.force {
        let duplicates = find_colocation_duplicates(&cib.constraints, node);
        if !duplicates.is_empty() {
            return Err(duplicate_error(&cib.constraints, &duplicates));
        }
    }
    Ok(Vec::new())
}

/// `colocation remove <rsc> <with-rsc>`: removes the pair in either order
///
/// Finding nothing is reported, not an error.
pub fn colocation_remove(cib: &mut Cib, rsc: &str, with_rsc: &str) -> Result<Vec<String>> {
    let matching: Vec<NodeId> = cib
        .constraints
        .elements_by_tag(Tag::Colocation)
        .into_iter()
        .filter(|node| match cib.constraints.element(*node) {
            Some(Element::Colocation(c)) => {
                let pair = (c.rsc.as_deref(), c.with_rsc.as_deref());
                pair == (Some(rsc), Some(with_rsc)) || pair == (Some(with_rsc), Some(rsc))
            }
            _ => false,
        })
        .collect();

    if matching.is_empty() {
        return Ok(vec!["No matching resources found in ordering list".to_string()]);
    }
    for node in matching {
        cib.constraints.remove(node);
    }
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_legacy_form() {
        let spec = parse_colocation_args(&args("A B 100 id=c1")).unwrap();
        assert_eq!((spec.rsc.as_str(), spec.with_rsc.as_str()), ("A", "B"));
        assert_eq!(spec.rsc_role, None);
        assert_eq!(spec.tokens, args("100 id=c1"));
    }

    #[test]
    fn test_with_form_and_roles() {
        let spec = parse_colocation_args(&args("master A with slave B -10")).unwrap();
        assert_eq!(spec.rsc_role.as_deref(), Some("Master"));
        assert_eq!(spec.with_rsc_role.as_deref(), Some("Slave"));
        assert_eq!(spec.with_rsc, "B");
        assert_eq!(spec.tokens, args("-10"));

        let spec = parse_colocation_args(&args("A with B")).unwrap();
        assert_eq!((spec.rsc.as_str(), spec.with_rsc.as_str()), ("A", "B"));
        assert!(spec.tokens.is_empty());
    }

    #[test]
    fn test_missing_target_is_usage_error() {
        assert!(matches!(
            parse_colocation_args(&args("master A with")),
            Err(CibError::Usage { .. })
        ));
        assert!(parse_colocation_args(&args("A")).is_err());
    }
}
