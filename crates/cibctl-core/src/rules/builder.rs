//! Syntax tree to typed `Rule`
//!
//! Ids follow the parent: the rule is `<parent>-rule`, each expression
//! `<rule>-expr`, date parts `<expr>-datespec` / `<expr>-duration`, all made
//! unique against the configuration and against ids handed out earlier in
//! the same build.

use std::collections::HashSet;

use super::parser::{BoolOp, RangeEnd, RuleNode};
use crate::ids::find_unique_id;
use crate::model::{Attributes, DateExpression, DateParts, Expression, Rule, RuleChild};

pub struct RuleBuilder<'a> {
    taken: &'a dyn Fn(&str) -> bool,
    allocated: HashSet<String>,
}

impl<'a> RuleBuilder<'a> {
    pub fn new(taken: &'a dyn Fn(&str) -> bool) -> Self {
        Self {
            taken,
            allocated: HashSet::new(),
        }
    }

    fn unique_id(&mut self, base: &str) -> String {
        let id = find_unique_id(base, |candidate| {
            (self.taken)(candidate) || self.allocated.contains(candidate)
        });
        self.allocated.insert(id.clone());
        id
    }

    /// Build the top-level rule for a constraint with id `parent_id`
    pub fn build(&mut self, tree: &RuleNode, parent_id: &str, rule_id: Option<&str>) -> Rule {
        let base = match rule_id {
            Some(id) => id.to_string(),
            None => format!("{}-rule", parent_id),
        };
        let mut rule = Rule {
            id: self.unique_id(&base),
            ..Default::default()
        };
        self.fill_rule(&mut rule, tree);
        rule
    }

    fn fill_rule(&mut self, rule: &mut Rule, node: &RuleNode) {
        match node {
            RuleNode::Bool { op, .. } => {
                rule.boolean_op = Some(op.as_str().to_string());
                self.fill_boolean(rule, *op, node);
            }
            leaf => {
                let child = self.expression(&rule.id, leaf);
                rule.children.push(child);
            }
        }
    }

    /// Flatten chains of the same operator into one rule; a different
    /// operator opens a nested rule
    fn fill_boolean(&mut self, rule: &mut Rule, op: BoolOp, node: &RuleNode) {
        let RuleNode::Bool { left, right, .. } = node else {
            return;
        };
        for child in [left.as_ref(), right.as_ref()] {
            match child {
                RuleNode::Bool { op: child_op, .. } if *child_op == op => {
                    self.fill_boolean(rule, op, child);
                }
                RuleNode::Bool { .. } => {
                    let mut nested = Rule {
                        id: self.unique_id(&format!("{}-rule", rule.id)),
                        ..Default::default()
                    };
                    self.fill_rule(&mut nested, child);
                    rule.children.push(RuleChild::Rule(nested));
                }
                leaf => {
                    let expr = self.expression(&rule.id, leaf);
                    rule.children.push(expr);
                }
            }
        }
    }

    fn expression(&mut self, rule_id: &str, node: &RuleNode) -> RuleChild {
        let id = self.unique_id(&format!("{}-expr", rule_id));
        match node {
            RuleNode::Presence {
                operation,
                attribute,
            } => RuleChild::Expression(Expression {
                id,
                attribute: Some(attribute.clone()),
                operation: Some(operation.clone()),
                ..Default::default()
            }),
            RuleNode::Compare {
                attribute,
                operation,
                value_type,
                value,
            } => RuleChild::Expression(Expression {
                id,
                attribute: Some(attribute.clone()),
                operation: Some(operation.clone()),
                value: Some(value.clone()),
                value_type: value_type.clone(),
                ..Default::default()
            }),
            RuleNode::DateGt(date) => RuleChild::Date(DateExpression {
                id,
                operation: Some("gt".to_string()),
                start: Some(date.clone()),
                ..Default::default()
            }),
            RuleNode::DateLt(date) => RuleChild::Date(DateExpression {
                id,
                operation: Some("lt".to_string()),
                end: Some(date.clone()),
                ..Default::default()
            }),
            RuleNode::DateInRange { start, end } => {
                let mut expr = DateExpression {
                    operation: Some("in_range".to_string()),
                    start: start.clone(),
                    ..Default::default()
                };
                match end {
                    RangeEnd::Date(date) => expr.end = Some(date.clone()),
                    RangeEnd::Duration(parts) => {
                        expr.duration = Some(DateParts {
                            id: self.unique_id(&format!("{}-duration", id)),
                            fields: parts.iter().cloned().collect::<Attributes>(),
                        });
                    }
                }
                expr.id = id;
                RuleChild::Date(expr)
            }
            RuleNode::DateSpec(parts) => RuleChild::Date(DateExpression {
                operation: Some("date_spec".to_string()),
                date_spec: Some(DateParts {
                    id: self.unique_id(&format!("{}-datespec", id)),
                    fields: parts.iter().cloned().collect::<Attributes>(),
                }),
                id,
                ..Default::default()
            }),
            // Boolean nodes never reach here; callers route them to rules.
            RuleNode::Bool { .. } => RuleChild::Expression(Expression {
                id,
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::parser::{parse, preprocess};
    use super::*;

    fn build(text: &str, taken: &dyn Fn(&str) -> bool) -> Rule {
        let tokens = preprocess(
            &text
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>(),
        );
        let tree = parse(&tokens).unwrap();
        RuleBuilder::new(taken).build(&tree, "location-A", None)
    }

    #[test]
    fn test_single_expression_ids() {
        let rule = build("#uname eq node1", &|_| false);
        assert_eq!(rule.id, "location-A-rule");
        assert_eq!(rule.boolean_op, None);
        match &rule.children[0] {
            RuleChild::Expression(expr) => {
                assert_eq!(expr.id, "location-A-rule-expr");
                assert_eq!(expr.value.as_deref(), Some("node1"));
            }
            other => panic!("unexpected child {:?}", other),
        }
    }

    #[test]
    fn test_same_operator_chain_is_flattened() {
        let rule = build("defined a and defined b and defined c", &|_| false);
        assert_eq!(rule.boolean_op.as_deref(), Some("and"));
        assert_eq!(rule.children.len(), 3);
        let ids: Vec<_> = rule
            .children
            .iter()
            .map(|c| match c {
                RuleChild::Expression(e) => e.id.clone(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(
            ids,
            vec![
                "location-A-rule-expr",
                "location-A-rule-expr-1",
                "location-A-rule-expr-2"
            ]
        );
    }

    #[test]
    fn test_mixed_operators_nest() {
        let rule = build("defined a or (defined b and defined c)", &|_| false);
        assert_eq!(rule.boolean_op.as_deref(), Some("or"));
        match &rule.children[1] {
            RuleChild::Rule(nested) => {
                assert_eq!(nested.id, "location-A-rule-rule");
                assert_eq!(nested.boolean_op.as_deref(), Some("and"));
                assert_eq!(nested.children.len(), 2);
            }
            other => panic!("unexpected child {:?}", other),
        }
    }

    #[test]
    fn test_ids_avoid_taken() {
        let rule = build("date-spec hours=9-16", &|id| id == "location-A-rule");
        assert_eq!(rule.id, "location-A-rule-1");
        match &rule.children[0] {
            RuleChild::Date(date) => {
                assert_eq!(date.operation.as_deref(), Some("date_spec"));
                assert_eq!(
                    date.date_spec.as_ref().map(|s| s.id.as_str()),
                    Some("location-A-rule-1-expr-datespec")
                );
            }
            other => panic!("unexpected child {:?}", other),
        }
    }
}
