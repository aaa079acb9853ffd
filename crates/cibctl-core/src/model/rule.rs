//! Rule expression trees attached to location constraints

use super::attributes::attribute_record;
use super::raw::RawElement;
use super::Attributes;

attribute_record! {
    /// `rule`: boolean combination of expressions and nested rules
    pub struct Rule {
        boolean_op => "boolean-op",
        score => "score",
        score_attribute => "score-attribute",
        role => "role",
    }
    children {
        /// Expressions and nested rules in document order
        children: Vec<RuleChild>,
    }
}

attribute_record! {
    /// `expression`: attribute test such as `#uname eq node1` or `defined pingd`
    pub struct Expression {
        attribute => "attribute",
        operation => "operation",
        value => "value",
        value_type => "type",
    }
}

attribute_record! {
    /// `date_expression`: `gt`, `lt`, `in_range` or `date_spec`
    pub struct DateExpression {
        operation => "operation",
        start => "start",
        end => "end",
    }
    children {
        /// Present when `operation` is `date_spec`
        date_spec: Option<DateParts>,
        /// Present for `in_range ... to duration ...`
        duration: Option<DateParts>,
        /// Unrecognized children, written back as-is
        other: Vec<RawElement>,
    }
}

/// `date_spec` or `duration` element: an id plus free-form date fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateParts {
    pub id: String,
    pub fields: Attributes,
}

/// Child of a `rule`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChild {
    Expression(Expression),
    Date(DateExpression),
    Rule(Rule),
    Other(RawElement),
}

impl Rule {
    /// Every id owned by this rule, its expressions and nested rules
    pub fn collect_ids(&self, out: &mut Vec<String>) {
        out.push(self.id.clone());
        for child in &self.children {
            match child {
                RuleChild::Expression(expr) => out.push(expr.id.clone()),
                RuleChild::Date(date) => {
                    out.push(date.id.clone());
                    if let Some(spec) = &date.date_spec {
                        out.push(spec.id.clone());
                    }
                    if let Some(duration) = &date.duration {
                        out.push(duration.id.clone());
                    }
                    for raw in &date.other {
                        raw.collect_ids(out);
                    }
                }
                RuleChild::Rule(nested) => nested.collect_ids(out),
                RuleChild::Other(raw) => raw.collect_ids(out),
            }
        }
    }

    /// Nested rules at any depth, in document order, `self` excluded
    pub fn descendant_rules(&self) -> Vec<&Rule> {
        let mut out = Vec::new();
        for child in &self.children {
            if let RuleChild::Rule(nested) = child {
                out.push(nested);
                out.extend(nested.descendant_rules());
            }
        }
        out
    }

    /// Detach the nested rule `id` found anywhere below this rule
    ///
    /// Enclosing nested rules left without children are detached as well.
    /// Returns whether a rule was removed.
    pub fn remove_nested_rule(&mut self, id: &str) -> bool {
        let before = self.children.len();
        self.children
            .retain(|child| !matches!(child, RuleChild::Rule(rule) if rule.id == id));
        if self.children.len() != before {
            return true;
        }

        let removed = self
            .nested_rules_mut()
            .any(|nested| nested.remove_nested_rule(id));
        if removed {
            self.children
                .retain(|child| !matches!(child, RuleChild::Rule(rule) if rule.children.is_empty()));
        }
        removed
    }

    pub fn nested_rules_mut(&mut self) -> impl Iterator<Item = &mut Rule> {
        self.children.iter_mut().filter_map(|child| match child {
            RuleChild::Rule(rule) => Some(rule),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(id: &str, children: Vec<RuleChild>) -> RuleChild {
        RuleChild::Rule(Rule {
            id: id.to_string(),
            children,
            ..Default::default()
        })
    }

    fn defined(id: &str) -> RuleChild {
        RuleChild::Expression(Expression {
            id: id.to_string(),
            operation: Some("defined".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_remove_nested_rule_prunes_emptied_parents() {
        let mut rule = Rule {
            id: "r".to_string(),
            children: vec![
                defined("r-expr"),
                nested("r-rule", vec![nested("r-rule-rule", vec![defined("x")])]),
            ],
            ..Default::default()
        };

        assert!(rule.remove_nested_rule("r-rule-rule"));
        assert_eq!(rule.children, vec![defined("r-expr")]);
        assert!(!rule.remove_nested_rule("r-rule-rule"));
    }

    #[test]
    fn test_descendant_rules_in_document_order() {
        let rule = Rule {
            id: "r".to_string(),
            children: vec![
                nested("a", vec![nested("a1", vec![defined("e1")])]),
                nested("b", vec![defined("e2")]),
            ],
            ..Default::default()
        };

        let ids: Vec<&str> = rule.descendant_rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a1", "b"]);
    }

    #[test]
    fn test_collect_ids_walks_nested_rules() {
        let rule = Rule {
            id: "r".to_string(),
            children: vec![
                RuleChild::Expression(Expression {
                    id: "r-expr".to_string(),
                    ..Default::default()
                }),
                RuleChild::Rule(Rule {
                    id: "r-rule".to_string(),
                    children: vec![RuleChild::Date(DateExpression {
                        id: "r-rule-expr".to_string(),
                        date_spec: Some(DateParts {
                            id: "r-rule-expr-datespec".to_string(),
                            fields: Attributes::new(),
                        }),
                        ..Default::default()
                    })],
                    ..Default::default()
                }),
            ],
            ..Default::default()
        };

        let mut ids = Vec::new();
        rule.collect_ids(&mut ids);
        assert_eq!(
            ids,
            vec!["r", "r-expr", "r-rule", "r-rule-expr", "r-rule-expr-datespec"]
        );
    }
}
