//! Rule expression engine: option prefix, parser, builder and renderers

pub mod builder;
pub mod parser;
pub mod render;

pub use render::{render_detailed, render_expression};

use crate::cib::Cib;
use crate::document::{Element, NodeId};
use crate::errors::{CibError, Result};
use crate::model::{capitalize, Attributes, Rule};
use crate::parse::is_score;

use builder::RuleBuilder;

/// Options every rule accepts before its expression
pub const RULE_OPTIONS: &[&str] = &["id", "role", "score", "score-attribute"];

/// Roles a rule may be restricted to
pub const RULE_ROLES: &[&str] = &["Master", "Slave", "Started", "Stopped"];

/// Split leading `name=value` options from the expression tokens
///
/// Only names in [`RULE_OPTIONS`] and `extra_options` are consumed; the first
/// token that is not one of them starts the expression.
pub fn parse_argv(tokens: &[String], extra_options: &[&str]) -> (Attributes, Vec<String>) {
    let mut options = Attributes::new();
    let mut rest = tokens;
    while let Some((first, tail)) = rest.split_first() {
        let known = first.split_once('=').filter(|(name, _)| {
            RULE_OPTIONS.contains(name) || extra_options.contains(name)
        });
        let Some((name, value)) = known else {
            break;
        };
        options.set(name, value);
        rest = tail;
    }
    (options, rest.to_vec())
}

/// Validate rule options, build the rule and attach it to a location constraint
///
/// The constraint loses its `node` and `score` attributes; a rule-based
/// location constraint carries neither. Nested rules get `score="0"`.
///
/// # Errors
///
/// - `InvalidRuleOption` for conflicting score options, bad roles or an empty
///   expression
/// - `InvalidScore` for a malformed `score`
/// - `InvalidId` / `IdInUse` for an explicit rule id
/// - `InvalidRule` when the tokens do not parse
pub fn add_rule(
    cib: &mut Cib,
    constraint: NodeId,
    mut options: Attributes,
    tokens: &[String],
) -> Result<NodeId> {
    if options.get("score").is_some_and(|s| !s.is_empty())
        && options.get("score-attribute").is_some_and(|s| !s.is_empty())
    {
        return Err(CibError::InvalidRuleOption {
            message: "can not specify both score and score-attribute".to_string(),
        });
    }
    if let Some(score) = options.get("score").filter(|s| !s.is_empty()) {
        if !is_score(score) {
            return Err(CibError::InvalidScore {
                score: score.to_string(),
            });
        }
    }
    if let Some(role) = options.get("role").filter(|r| !r.is_empty()) {
        let normalized = capitalize(role);
        if !RULE_ROLES.contains(&normalized.as_str()) {
            return Err(CibError::InvalidRuleOption {
                message: format!("invalid role '{}', use {}", role, RULE_ROLES.join(", ")),
            });
        }
        options.set("role", normalized);
    }
    let explicit_id = options.remove("id").filter(|id| !id.is_empty());
    if let Some(id) = &explicit_id {
        cib.check_new_id(id, "rule id")?;
    }
    if tokens.is_empty() {
        return Err(CibError::InvalidRuleOption {
            message: "no rule expression was specified".to_string(),
        });
    }

    let tree = parser::parse(&parser::preprocess(tokens)).map_err(|e| CibError::InvalidRule {
        rule: tokens.join(" "),
        reason: e.to_string(),
    })?;

    let parent_id = cib
        .constraints
        .element(constraint)
        .and_then(Element::id)
        .map(str::to_string)
        .ok_or_else(|| CibError::Internal {
            message: "rule parent is not a constraint".to_string(),
        })?;

    let mut rule = {
        let taken = |id: &str| cib.id_exists(id);
        RuleBuilder::new(&taken).build(&tree, &parent_id, explicit_id.as_deref())
    };

    let has_score = ["score", "score-attribute"]
        .iter()
        .any(|name| options.get(name).is_some_and(|v| !v.is_empty()));
    if !has_score {
        options.set("score", "INFINITY");
    }
    for (name, value) in options.iter() {
        if !value.is_empty() {
            rule.set_attribute(name, value);
        }
    }
    zero_nested_scores(&mut rule);

    if let Some(Element::Location(location)) = cib.constraints.element_mut(constraint) {
        location.score = None;
        location.node = None;
    }

    tracing::debug!(rule_id = %rule.id, constraint_id = %parent_id, "rule built");
    cib.constraints
        .append_child(constraint, Element::Rule(rule))
        .ok_or_else(|| CibError::Internal {
            message: "rule parent was removed".to_string(),
        })
}

fn zero_nested_scores(rule: &mut Rule) {
    for nested in rule.nested_rules_mut() {
        nested.score = Some("0".to_string());
        zero_nested_scores(nested);
    }
}
